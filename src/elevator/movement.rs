/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::{debug, info};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::clock::{is_cancelled, Clock};
use crate::config::ElevatorConfig;
use crate::elevator::Elevator;
use crate::error::{Error, Result};

/// How a single move ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Arrived,
    Cancelled,
}

/// How a whole drive loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveReport {
    /// Every pending stop was served and the elevator is Idle again.
    Completed { stops_served: usize },
    /// Cancelled while moving or while passengers were entering/leaving.
    Cancelled { at_floor: i32 },
}

/**
 * # Movement Driver
 * Advances a cabin floor by floor and runs its drive loop.
 *
 * The elevator lock is only held while fields are read or written. It is
 * always released before the driver sleeps, so dispatchers and readers never
 * wait on a moving cabin.
 *
 * # Fields
 * - `clock`:                   Source of every pause and of cancellation.
 * - `move_delay`:              Pause after each floor travelled.
 * - `pickup_dropoff_delay`:    Pause at every served stop.
 */
#[derive(Clone)]
pub struct MovementDriver {
    clock: Arc<dyn Clock>,
    move_delay: Duration,
    pickup_dropoff_delay: Duration,
}

impl MovementDriver {
    pub fn new(config: &ElevatorConfig, clock: Arc<dyn Clock>) -> MovementDriver {
        MovementDriver {
            clock,
            move_delay: config.move_delay(),
            pickup_dropoff_delay: config.pickup_dropoff_delay(),
        }
    }

    /**
     * Serves pending stops until none remain.
     *
     * Each round asks the elevator for the next stop in its scan direction,
     * moves there and clears it. The round that finds nothing left settles
     * the elevator back to Idle under the same lock.
     */
    pub fn drive(&self, car: &Mutex<Elevator>, cancel: &cbc::Receiver<()>) -> Result<DriveReport> {
        let mut stops_served = 0;
        loop {
            let next = lock(car)?.next_stop();
            let Some(floor) = next else {
                return Ok(DriveReport::Completed { stops_served });
            };

            match self.move_to_floor(car, floor, cancel)? {
                MoveOutcome::Arrived => stops_served += 1,
                MoveOutcome::Cancelled => {
                    let mut elevator = lock(car)?;
                    elevator.interrupt();
                    info!(
                        "Elevator {} halted at floor {}",
                        elevator.id(),
                        elevator.current_floor()
                    );
                    return Ok(DriveReport::Cancelled {
                        at_floor: elevator.current_floor(),
                    });
                }
            }
        }
    }

    /**
     * Moves the cabin to `floor`, one floor per `move_delay`, then holds it
     * for `pickup_dropoff_delay` and clears the stop at that floor.
     *
     * Cancellation is checked between floors only. A cancelled move leaves
     * the cabin on the last floor it reached and keeps every pending stop.
     */
    pub fn move_to_floor(
        &self,
        car: &Mutex<Elevator>,
        floor: i32,
        cancel: &cbc::Receiver<()>,
    ) -> Result<MoveOutcome> {
        let id = {
            let mut elevator = lock(car)?;
            elevator.begin_move(floor);
            elevator.id()
        };

        loop {
            if is_cancelled(cancel) {
                return Ok(MoveOutcome::Cancelled);
            }
            let Some(reached) = lock(car)?.step_toward(floor) else {
                break;
            };
            debug!("Elevator {}: floor {}", id, reached);
            if self.clock.sleep(self.move_delay, cancel).is_err() {
                return Ok(MoveOutcome::Cancelled);
            }
        }

        lock(car)?.arrive();
        crate::event!(
            "Elevator {} arrived at floor {}. Passengers entering/leaving...",
            id, floor
        );
        if self.clock.sleep(self.pickup_dropoff_delay, cancel).is_err() {
            return Ok(MoveOutcome::Cancelled);
        }

        lock(car)?.complete_stop(floor);
        Ok(MoveOutcome::Arrived)
    }
}

fn lock(car: &Mutex<Elevator>) -> Result<MutexGuard<'_, Elevator>> {
    car.lock().map_err(|_| Error::poisoned("elevator"))
}
