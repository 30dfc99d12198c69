/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::debug;
use std::collections::BTreeMap;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::{Direction, ElevatorRequest, ElevatorSnapshot, Status};

/***************************************/
/*               Enums                 */
/***************************************/
/// Which behaviour currently owns the cabin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// At rest, no drive loop is running.
    Idle,
    /// A drive loop is running and will keep the cabin busy until every
    /// pending stop is served.
    Moving,
}

/// What the caller of [`Elevator::handle`] has to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Nothing to serve.
    Rest,
    /// The elevator just left `Idle`; a drive loop must be started for it.
    StartDrive,
    /// A drive loop already owns the cabin and will pick up new stops.
    Continue,
}

/**
 * One cabin: its position, pending stops and state machine.
 *
 * The struct itself is plain data. The fleet wraps every elevator in a mutex,
 * and all methods here run with that lock held. None of them suspend, which
 * keeps every transition atomic with respect to concurrent readers.
 *
 * # Fields
 * - `id`:              Stable identifier, the elevator's index in the fleet.
 * - `current_floor`:   Last floor reached. Only changes one floor at a time.
 * - `target_floor`:    Stop currently being driven to, `None` when at rest.
 * - `direction`:       Scan direction derived from the pending stops.
 * - `status`:          Externally visible status.
 * - `state`:           Active state machine variant.
 * - `pending_stops`:   Requested floors, unique per floor, sorted ascending.
 */
#[derive(Debug, Clone)]
pub struct Elevator {
    id: usize,
    current_floor: i32,
    target_floor: Option<i32>,
    direction: Direction,
    status: Status,
    state: State,
    pending_stops: BTreeMap<i32, ElevatorRequest>,
}

impl Elevator {
    pub fn new(id: usize) -> Elevator {
        Elevator {
            id,
            current_floor: 0,
            target_floor: None,
            direction: Direction::Idle,
            status: Status::Stopped,
            state: State::Idle,
            pending_stops: BTreeMap::new(),
        }
    }

    /// An idle elevator resting at `floor`.
    pub fn parked_at(id: usize, floor: i32) -> Elevator {
        Elevator {
            current_floor: floor,
            ..Elevator::new(id)
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn current_floor(&self) -> i32 {
        self.current_floor
    }

    pub fn target_floor(&self) -> Option<i32> {
        self.target_floor
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.status == Status::Stopped
    }

    pub fn pending_floors(&self) -> Vec<i32> {
        self.pending_stops.keys().copied().collect()
    }

    pub fn snapshot(&self) -> ElevatorSnapshot {
        ElevatorSnapshot {
            id: self.id,
            current_floor: self.current_floor,
            target_floor: self.target_floor,
            status: self.status,
            direction: self.direction,
            pending_stops: self.pending_floors(),
        }
    }

    /// `Stopped` exactly when there is nothing left to serve.
    pub fn holds_idle_invariant(&self) -> bool {
        let at_rest = self.pending_stops.is_empty() && self.direction == Direction::Idle;
        (self.status == Status::Stopped) == at_rest
    }

    /**
     * Records a stop. Returns `false` when the request names the floor the
     * cabin is already on, in which case nothing changes.
     *
     * Only records; starting the cabin is [`Elevator::handle`]'s job.
     */
    pub fn add_request(&mut self, request: ElevatorRequest) -> bool {
        let floor = request.requested_floor();
        if floor == self.current_floor {
            debug!("Elevator {}: already at floor {}, request dropped", self.id, floor);
            return false;
        }

        // Keep the oldest request for a floor
        self.pending_stops.entry(floor).or_insert(request);
        if self.target_floor.is_none() || self.pending_stops.len() == 1 {
            self.target_floor = Some(floor);
        }
        true
    }

    /**
     * Runs the active state's behaviour.
     *
     * Idle with a target away from the current floor switches to Moving in
     * the same call and reports [`Action::StartDrive`]; the caller never sees
     * an intermediate state. The initial direction points at the nearest
     * pending stop, which is where the drive loop will head first.
     */
    pub fn handle(&mut self) -> Action {
        match self.state {
            State::Idle => {
                // A stop at the current floor counts as served.
                self.pending_stops.remove(&self.current_floor);
                if self.target_floor.map_or(true, |t| t == self.current_floor) {
                    self.target_floor = self.nearest_pending();
                }

                match self.target_floor {
                    Some(target) => {
                        let nearest = self.nearest_pending().unwrap_or(target);
                        self.state = State::Moving;
                        self.status = Status::Moving;
                        self.direction = Direction::toward(self.current_floor, nearest);
                        debug!("Elevator {}: Idle -> Moving (target {})", self.id, target);
                        Action::StartDrive
                    }
                    None => {
                        self.settle();
                        Action::Rest
                    }
                }
            }
            State::Moving => {
                // The drive loop served its last stop and has not looked for
                // the next one yet. It will pick this stop up.
                if self.status == Status::Stopped {
                    if let Some(nearest) = self.nearest_pending() {
                        self.status = Status::Moving;
                        self.target_floor = Some(nearest);
                        self.direction = Direction::toward(self.current_floor, nearest);
                    }
                }
                Action::Continue
            }
        }
    }

    /**
     * Picks the next stop for the drive loop.
     *
     * Keeps the scan direction while stops remain ahead, reverses when only
     * stops behind remain, and returns the closest stop strictly ahead. When
     * nothing is pending the elevator settles back to Idle and `None` is
     * returned.
     */
    pub fn next_stop(&mut self) -> Option<i32> {
        self.pending_stops.remove(&self.current_floor);
        self.update_direction();

        match self.stop_ahead() {
            Some(floor) => {
                self.target_floor = Some(floor);
                Some(floor)
            }
            None => {
                self.settle();
                None
            }
        }
    }

    pub fn begin_move(&mut self, floor: i32) {
        self.status = Status::Moving;
        self.target_floor = Some(floor);
        if floor != self.current_floor {
            self.direction = Direction::toward(self.current_floor, floor);
        }
    }

    /// Moves the cabin one floor toward `floor`. Returns the floor reached,
    /// or `None` if the cabin is already there.
    pub fn step_toward(&mut self, floor: i32) -> Option<i32> {
        if self.current_floor == floor {
            return None;
        }
        self.current_floor += if self.current_floor < floor { 1 } else { -1 };
        Some(self.current_floor)
    }

    pub fn arrive(&mut self) {
        self.status = Status::DroppingPicking;
    }

    /// Clears the stop at `floor` after the pickup/dropoff pause. With
    /// nothing left the cabin reports `Stopped`, but the state stays with the
    /// drive loop until its next [`Elevator::next_stop`].
    pub fn complete_stop(&mut self, floor: i32) {
        self.pending_stops.remove(&floor);
        if self.pending_stops.is_empty() {
            self.rest();
        }
    }

    /**
     * Ends the drive loop early. The cabin keeps the last floor it reached
     * and every pending stop. The state drops back to Idle so the next
     * dispatch can restart it.
     */
    pub fn interrupt(&mut self) {
        self.state = State::Idle;
        if self.pending_stops.is_empty() {
            self.settle();
        }
    }

    fn settle(&mut self) {
        self.state = State::Idle;
        self.rest();
    }

    fn rest(&mut self) {
        self.status = Status::Stopped;
        self.direction = Direction::Idle;
        self.target_floor = None;
    }

    fn update_direction(&mut self) {
        if self.pending_stops.is_empty() {
            self.direction = Direction::Idle;
            return;
        }

        let floor = self.current_floor;
        let has_above = self.pending_stops.range(floor + 1..).next().is_some();
        let has_below = self.pending_stops.range(..floor).next().is_some();

        self.direction = match self.direction {
            Direction::Idle => match self.nearest_pending() {
                Some(nearest) => Direction::toward(floor, nearest),
                None => Direction::Idle,
            },
            Direction::Up if has_above => Direction::Up,
            Direction::Down if has_below => Direction::Down,
            Direction::Up if has_below => Direction::Down,
            Direction::Down if has_above => Direction::Up,
            _ => Direction::Idle,
        };
    }

    fn stop_ahead(&self) -> Option<i32> {
        let floor = self.current_floor;
        match self.direction {
            Direction::Up => self.pending_stops.range(floor + 1..).next().map(|(f, _)| *f),
            Direction::Down => self.pending_stops.range(..floor).next_back().map(|(f, _)| *f),
            Direction::Idle => None,
        }
    }

    // Ties go to the lower floor
    fn nearest_pending(&self) -> Option<i32> {
        self.pending_stops
            .keys()
            .copied()
            .filter(|f| *f != self.current_floor)
            .min_by_key(|f| (f - self.current_floor).abs())
    }
}

#[cfg(test)]
impl Elevator {
    /// An elevator whose drive loop is (supposedly) carrying it from `floor`
    /// toward `destination`.
    pub(crate) fn in_transit(id: usize, floor: i32, destination: i32) -> Elevator {
        let mut elevator = Elevator::parked_at(id, floor);
        elevator.add_request(ElevatorRequest::new(destination, std::time::Instant::now()));
        elevator.state = State::Moving;
        elevator.status = Status::Moving;
        elevator.direction = Direction::toward(floor, destination);
        elevator
    }
}
