/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::{debug, error, info};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, Builder, JoinHandle};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::elevator::{Action, DriveReport, Elevator, MovementDriver};
use crate::error::{Error, Result};
use crate::shared::{ElevatorRequest, ElevatorSnapshot};

type DriveHandle = JoinHandle<Result<DriveReport>>;

/**
 * Owns every elevator of the simulation and supervises their drive loops.
 *
 * Elevators live in a fixed arena indexed by id, one mutex per entry. The
 * coordinator and the registry share the fleet through an `Arc` and address
 * elevators by id, so every change is visible to all of them.
 *
 * Each elevator has at most one drive loop thread at a time. Its join handle
 * is kept here and its outcome is logged once the thread is reaped.
 *
 * # Fields
 * - `cars`:        The arena, `cars[id]` is elevator `id`.
 * - `driver`:      Movement driver shared by all drive loops.
 * - `drives`:      Join handle of each elevator's latest drive loop.
 * - `cancel_tx`:   Dropped on halt, which cancels every drive loop.
 * - `cancel_rx`:   Handed to each drive loop.
 */
pub struct Fleet {
    cars: Vec<Arc<Mutex<Elevator>>>,
    driver: MovementDriver,
    drives: Mutex<Vec<Option<DriveHandle>>>,
    cancel_tx: Mutex<Option<cbc::Sender<()>>>,
    cancel_rx: cbc::Receiver<()>,
}

impl Fleet {
    /// `n_elevators` idle elevators on floor 0.
    pub fn new(n_elevators: usize, driver: MovementDriver) -> Fleet {
        Fleet::from_elevators((0..n_elevators).map(Elevator::new).collect(), driver)
    }

    /// Builds a fleet from prepared elevators. Their ids must match their
    /// position in `elevators`.
    pub fn from_elevators(elevators: Vec<Elevator>, driver: MovementDriver) -> Fleet {
        debug_assert!(elevators.iter().enumerate().all(|(i, e)| e.id() == i));
        let (cancel_tx, cancel_rx) = cbc::unbounded::<()>();
        let drives = elevators.iter().map(|_| None).collect();

        Fleet {
            cars: elevators
                .into_iter()
                .map(|elevator| Arc::new(Mutex::new(elevator)))
                .collect(),
            driver,
            drives: Mutex::new(drives),
            cancel_tx: Mutex::new(Some(cancel_tx)),
            cancel_rx,
        }
    }

    pub fn len(&self) -> usize {
        self.cars.len()
    }

    pub fn snapshot(&self, id: usize) -> Result<Option<ElevatorSnapshot>> {
        match self.cars.get(id) {
            Some(car) => Ok(Some(lock_car(car, id)?.snapshot())),
            None => Ok(None),
        }
    }

    pub fn snapshots(&self) -> Result<Vec<ElevatorSnapshot>> {
        self.cars
            .iter()
            .enumerate()
            .map(|(id, car)| Ok(lock_car(car, id)?.snapshot()))
            .collect()
    }

    pub fn is_any_idle(&self) -> Result<bool> {
        for (id, car) in self.cars.iter().enumerate() {
            if lock_car(car, id)?.is_idle() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /**
     * Adds a stop to elevator `id` and starts its drive loop if it was idle.
     *
     * Returns `false` if the elevator was already on the requested floor.
     * Never waits for the cabin to move.
     */
    pub fn dispatch(&self, id: usize, request: ElevatorRequest) -> Result<bool> {
        let car = self
            .cars
            .get(id)
            .ok_or_else(|| Error::Dispatch(format!("no elevator with id {}", id)))?;

        let action = {
            let mut elevator = lock_car(car, id)?;
            if !elevator.add_request(request) {
                return Ok(false);
            }
            elevator.handle()
        };

        if action == Action::StartDrive {
            self.start_drive(id)?;
        }
        Ok(true)
    }

    /// Waits for every running drive loop to finish and logs the outcomes.
    pub fn join_drives(&self) {
        let handles: Vec<(usize, DriveHandle)> = match self.drives.lock() {
            Ok(mut drives) => drives
                .iter_mut()
                .enumerate()
                .filter_map(|(id, slot)| slot.take().map(|handle| (id, handle)))
                .collect(),
            Err(_) => {
                error!("Drive loop registry is unreachable, drive loops left detached");
                return;
            }
        };

        for (id, handle) in handles {
            observe(id, handle.join());
        }
    }

    /// Cancels every in-flight movement and joins the drive loops. Cabins
    /// stay on the last floor they reached.
    pub fn halt(&self) {
        match self.cancel_tx.lock() {
            Ok(mut cancel_tx) => drop(cancel_tx.take()),
            Err(_) => error!("Cancel channel is unreachable, drive loops not cancelled"),
        }
        self.join_drives();
    }

    fn start_drive(&self, id: usize) -> Result<()> {
        let mut drives = self
            .drives
            .lock()
            .map_err(|_| Error::poisoned("drive loop registry"))?;

        // The previous loop already settled the elevator; it is at most
        // returning from its last round.
        if let Some(previous) = drives[id].take() {
            observe(id, previous.join());
        }

        let car = self.cars[id].clone();
        let driver = self.driver.clone();
        let cancel = self.cancel_rx.clone();
        let spawned = Builder::new()
            .name(format!("elevator_{}", id))
            .spawn(move || driver.drive(&car, &cancel));

        match spawned {
            Ok(handle) => {
                debug!("Drive loop started for elevator {}", id);
                drives[id] = Some(handle);
                Ok(())
            }
            Err(e) => {
                lock_car(&self.cars[id], id)?.interrupt();
                Err(Error::Dispatch(format!(
                    "failed to start drive loop for elevator {}: {}",
                    id, e
                )))
            }
        }
    }
}

fn lock_car(car: &Mutex<Elevator>, id: usize) -> Result<MutexGuard<'_, Elevator>> {
    car.lock()
        .map_err(|_| Error::poisoned(format!("elevator {}", id)))
}

fn observe(id: usize, joined: thread::Result<Result<DriveReport>>) {
    match joined {
        Ok(Ok(DriveReport::Completed { stops_served })) => {
            debug!("Elevator {} finished its round ({} stops)", id, stops_served)
        }
        Ok(Ok(DriveReport::Cancelled { at_floor })) => {
            info!("Elevator {} drive loop cancelled at floor {}", id, at_floor)
        }
        Ok(Err(e)) => error!("Elevator {} drive loop failed: {}", id, e),
        Err(_) => error!("Elevator {} drive loop panicked", id),
    }
}
