/*
 * Unit tests for the request intake
 *
 * The unit tests follows the Arrange, Act, Assert pattern.
 *
 * The coordinator and the registry are replaced by hand-written mocks so the
 * tests control availability exactly. Dispatched floors are reported on a
 * channel, which lets the tests wait on the drain loop with a timeout.
 */

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod intake_tests {
    use crate::clock::SystemClock;
    use crate::coordinator::{Assignment, Dispatch};
    use crate::error::{Error, Result};
    use crate::fleet::ElevatorRepository;
    use crate::intake::{RequestIntake, Submission};
    use crate::shared::{ElevatorRequest, ElevatorSnapshot};
    use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    const POLL: Duration = Duration::from_millis(20);

    #[derive(Default)]
    struct MockRepository {
        idle: AtomicBool,
        fail: AtomicBool,
    }

    impl ElevatorRepository for MockRepository {
        fn all_elevators(&self) -> Result<Vec<ElevatorSnapshot>> {
            Ok(Vec::new())
        }

        fn elevator_by_id(&self, _id: usize) -> Result<Option<ElevatorSnapshot>> {
            Ok(None)
        }

        fn is_any_idle(&self) -> Result<bool> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(Error::InvalidOperation("fail".to_string()));
            }
            Ok(self.idle.load(Ordering::SeqCst))
        }
    }

    /// Reports every assigned floor and makes the single elevator busy,
    /// like a real dispatch would.
    struct MockDispatcher {
        repository: Arc<MockRepository>,
        assigned_tx: Sender<i32>,
        failures_left: AtomicUsize,
    }

    impl Dispatch for MockDispatcher {
        fn assign(&self, request: ElevatorRequest) -> Result<Assignment> {
            if self.failures_left.load(Ordering::SeqCst) > 0 {
                self.failures_left.fetch_sub(1, Ordering::SeqCst);
                return Err(Error::Dispatch("boom".to_string()));
            }
            self.repository.idle.store(false, Ordering::SeqCst);
            self.assigned_tx.send(request.requested_floor()).unwrap();
            Ok(Assignment::Assigned(0))
        }
    }

    fn setup_intake(
        idle: bool,
        failures: usize,
        poll_interval: Duration,
    ) -> (RequestIntake, Arc<MockRepository>, Receiver<i32>) {
        let repository = Arc::new(MockRepository::default());
        repository.idle.store(idle, Ordering::SeqCst);
        let (assigned_tx, assigned_rx) = unbounded::<i32>();
        let dispatcher = Arc::new(MockDispatcher {
            repository: repository.clone(),
            assigned_tx,
            failures_left: AtomicUsize::new(failures),
        });

        let intake = RequestIntake::start(
            dispatcher,
            repository.clone(),
            Arc::new(SystemClock),
            poll_interval,
        )
        .unwrap();
        (intake, repository, assigned_rx)
    }

    #[test]
    fn test_submit_dispatches_when_idle() {
        // Arrange
        let (intake, _repository, assigned_rx) = setup_intake(true, 0, POLL);

        // Act
        let submission = intake.submit(5).unwrap();

        // Assert
        assert_eq!(submission, Submission::Dispatched(Assignment::Assigned(0)));
        assert_eq!(assigned_rx.try_recv(), Ok(5));
        assert_eq!(intake.queued(), 0);
        intake.shutdown();
    }

    #[test]
    fn test_submit_queues_when_unavailable() {
        // Arrange
        let (intake, _repository, assigned_rx) = setup_intake(false, 0, POLL);
        let start = Instant::now();

        // Act
        let submission = intake.submit(7).unwrap();

        // Assert
        assert!(start.elapsed() < Duration::from_millis(100));
        assert_eq!(submission, Submission::Queued);
        assert_eq!(intake.queued(), 1);
        assert!(assigned_rx.try_recv().is_err());
        intake.shutdown();
    }

    #[test]
    fn test_submit_propagates_failure() {
        // Arrange
        let (intake, repository, _assigned_rx) = setup_intake(true, 0, POLL);
        repository.fail.store(true, Ordering::SeqCst);

        // Act
        let result = intake.submit(1);

        // Assert
        match result {
            Err(Error::InvalidOperation(_)) => {}
            other => panic!("expected InvalidOperation, got {:?}", other),
        }
        assert_eq!(intake.queued(), 0);
        intake.shutdown();
    }

    #[test]
    fn test_drain_dispatches_one_per_idle_elevator() {
        // Arrange
        let (intake, repository, assigned_rx) = setup_intake(false, 0, POLL);
        intake.submit(7).unwrap();
        intake.submit(2).unwrap();
        assert_eq!(intake.queued(), 2);

        // Act
        repository.idle.store(true, Ordering::SeqCst);

        // Assert
        assert_eq!(assigned_rx.recv_timeout(POLL * 10), Ok(7));
        assert_eq!(
            assigned_rx.recv_timeout(POLL * 3),
            Err(RecvTimeoutError::Timeout)
        );
        assert_eq!(intake.queued(), 1);

        // The next idle elevator takes the next request in arrival order
        repository.idle.store(true, Ordering::SeqCst);
        assert_eq!(assigned_rx.recv_timeout(POLL * 10), Ok(2));
        intake.shutdown();
    }

    #[test]
    fn test_drain_loop_survives_failures() {
        // Arrange
        let (intake, repository, assigned_rx) = setup_intake(false, 1, POLL);
        intake.submit(3).unwrap();
        intake.submit(8).unwrap();

        // Act
        repository.idle.store(true, Ordering::SeqCst);

        // Assert
        // The first dispatch fails and its request is dropped, the loop goes on
        assert_eq!(assigned_rx.recv_timeout(POLL * 10), Ok(8));
        assert_eq!(intake.queued(), 0);
        intake.shutdown();
    }

    #[test]
    fn test_drain_loop_survives_availability_errors() {
        // Arrange
        let (intake, repository, assigned_rx) = setup_intake(false, 0, POLL);
        intake.submit(4).unwrap();
        repository.fail.store(true, Ordering::SeqCst);
        repository.idle.store(true, Ordering::SeqCst);
        std::thread::sleep(POLL * 3);

        // Act
        repository.fail.store(false, Ordering::SeqCst);

        // Assert
        assert_eq!(assigned_rx.recv_timeout(POLL * 10), Ok(4));
        intake.shutdown();
    }

    #[test]
    fn test_shutdown_is_prompt_and_idempotent() {
        // Arrange
        let (intake, _repository, _assigned_rx) = setup_intake(false, 0, Duration::from_secs(30));
        intake.submit(6).unwrap();

        // Act
        let start = Instant::now();
        intake.shutdown();
        intake.shutdown();

        // Assert
        assert!(start.elapsed() < Duration::from_secs(5));
        // Submissions after shutdown are still buffered, never dispatched
        assert_eq!(intake.submit(9).unwrap(), Submission::Queued);
        assert_eq!(intake.queued(), 2);
    }
}
