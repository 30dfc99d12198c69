/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::info;
use std::sync::Arc;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::clock::Clock;
use crate::config::Config;
use crate::coordinator::Coordinator;
use crate::elevator::MovementDriver;
use crate::error::Result;
use crate::fleet::{ElevatorRegistry, ElevatorRepository, Fleet};
use crate::intake::{RequestIntake, Submission};
use crate::shared::ElevatorSnapshot;

/**
 * A running simulation: fleet, coordinator, registry and intake wired
 * together. This is the surface the console front end talks to.
 */
pub struct ElevatorSystem {
    fleet: Arc<Fleet>,
    registry: ElevatorRegistry,
    intake: RequestIntake,
    max_floor: i32,
}

impl ElevatorSystem {
    pub fn start(config: &Config, clock: Arc<dyn Clock>) -> Result<ElevatorSystem> {
        config.validate()?;

        let driver = MovementDriver::new(&config.elevator, clock.clone());
        let fleet = Arc::new(Fleet::new(config.elevator_system.n_elevators, driver));
        let registry = ElevatorRegistry::new(fleet.clone());
        let coordinator = Coordinator::new(fleet.clone(), config.max_floor());
        let intake = RequestIntake::start(
            Arc::new(coordinator),
            Arc::new(registry.clone()),
            clock,
            config.intake.poll_interval(),
        )?;

        info!(
            "Elevator system started with {} elevator(s) and floors 0..={}",
            fleet.len(),
            config.max_floor()
        );
        Ok(ElevatorSystem {
            fleet,
            registry,
            intake,
            max_floor: config.max_floor(),
        })
    }

    pub fn max_floor(&self) -> i32 {
        self.max_floor
    }

    pub fn submit(&self, floor: i32) -> Result<Submission> {
        self.intake.submit(floor)
    }

    pub fn list_elevators(&self) -> Result<Vec<ElevatorSnapshot>> {
        self.registry.all_elevators()
    }

    pub fn get_elevator(&self, id: usize) -> Result<Option<ElevatorSnapshot>> {
        self.registry.elevator_by_id(id)
    }

    pub fn queued_requests(&self) -> usize {
        self.intake.queued()
    }

    /// Nothing buffered and every elevator at rest.
    pub fn is_settled(&self) -> Result<bool> {
        if !self.intake.is_drained() {
            return Ok(false);
        }
        Ok(self.list_elevators()?.iter().all(|e| e.is_idle()))
    }

    /// Stops the drain loop, then cancels and joins every drive loop.
    /// Safe to call more than once.
    pub fn shutdown(&self) {
        self.intake.shutdown();
        self.fleet.halt();
        info!("Elevator system stopped");
    }
}

impl Drop for ElevatorSystem {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;
    use crate::coordinator::Assignment;
    use crate::shared::Status::Stopped;
    use std::thread;
    use std::time::{Duration, Instant};

    fn config(n_elevators: usize, move_delay_ms: u64) -> Config {
        let mut config = Config::new(n_elevators, 10);
        config.elevator.move_delay_ms = move_delay_ms;
        config.elevator.pickup_dropoff_delay_ms = 0;
        config.intake.poll_interval_ms = 10;
        config
    }

    fn wait_until_settled(system: &ElevatorSystem, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if system.is_settled().unwrap() {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        false
    }

    #[test]
    fn test_single_elevator_end_to_end() {
        // Arrange
        let system = ElevatorSystem::start(&config(1, 0), Arc::new(SystemClock)).unwrap();

        // Act
        let submission = system.submit(3).unwrap();

        // Assert
        assert_eq!(submission, Submission::Dispatched(Assignment::Assigned(0)));
        assert!(wait_until_settled(&system, Duration::from_secs(2)));
        let elevator = system.get_elevator(0).unwrap().unwrap();
        assert_eq!(elevator.current_floor, 3);
        assert_eq!(elevator.status, Stopped);
        assert!(elevator.pending_stops.is_empty());
        system.shutdown();
    }

    #[test]
    fn test_busy_fleet_buffers_then_drains() {
        // Arrange
        let system = ElevatorSystem::start(&config(1, 20), Arc::new(SystemClock)).unwrap();
        system.submit(4).unwrap();

        // Act
        let queued = system.submit(7).unwrap();

        // Assert
        assert_eq!(queued, Submission::Queued);
        assert_eq!(system.queued_requests(), 1);
        assert!(wait_until_settled(&system, Duration::from_secs(5)));
        assert_eq!(system.get_elevator(0).unwrap().unwrap().current_floor, 7);
    }

    #[test]
    fn test_invalid_floor_has_no_effect() {
        // Arrange
        let system = ElevatorSystem::start(&config(2, 0), Arc::new(SystemClock)).unwrap();
        let before = system.list_elevators().unwrap();

        // Act
        let submission = system.submit(-1).unwrap();

        // Assert
        assert_eq!(submission, Submission::Dispatched(Assignment::Rejected));
        assert_eq!(system.list_elevators().unwrap(), before);
        assert_eq!(system.queued_requests(), 0);
    }

    #[test]
    fn test_unknown_elevator_is_not_found() {
        let system = ElevatorSystem::start(&config(2, 0), Arc::new(SystemClock)).unwrap();

        assert!(system.get_elevator(5).unwrap().is_none());
        assert_eq!(system.list_elevators().unwrap().len(), 2);
    }

    #[test]
    fn test_shutdown_twice_is_harmless() {
        let system = ElevatorSystem::start(&config(1, 50), Arc::new(SystemClock)).unwrap();
        system.submit(9).unwrap();

        system.shutdown();
        system.shutdown();

        let elevator = system.get_elevator(0).unwrap().unwrap();
        assert!(elevator.current_floor < 9);
    }
}
