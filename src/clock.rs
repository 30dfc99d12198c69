/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use std::time::{Duration, Instant};

/// Returned by [`Clock::sleep`] when the wait was interrupted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

/**
 * Time source for the simulation.
 *
 * Every suspension point in the core (movement ticks, pickup/dropoff pauses
 * and the intake poll interval) goes through `sleep`, so tests can swap in a
 * clock that observes or interrupts those points.
 *
 * A cancel channel fires either by receiving a message or by having all its
 * senders dropped. Both interrupt the sleep.
 */
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;

    fn sleep(&self, duration: Duration, cancel: &cbc::Receiver<()>) -> Result<(), Cancelled>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration, cancel: &cbc::Receiver<()>) -> Result<(), Cancelled> {
        cbc::select! {
            recv(cancel) -> _ => Err(Cancelled),
            default(duration) => Ok(()),
        }
    }
}

/// Non-blocking check of a cancel channel.
pub fn is_cancelled(cancel: &cbc::Receiver<()>) -> bool {
    !matches!(cancel.try_recv(), Err(cbc::TryRecvError::Empty))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use std::thread;

    #[test]
    fn test_sleep_runs_to_completion() {
        // Arrange
        let (_cancel_tx, cancel_rx) = unbounded::<()>();
        let start = Instant::now();

        // Act
        let result = SystemClock.sleep(Duration::from_millis(20), &cancel_rx);

        // Assert
        assert_eq!(result, Ok(()));
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_sleep_is_interrupted_by_message() {
        // Arrange
        let (cancel_tx, cancel_rx) = unbounded::<()>();
        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            cancel_tx.send(()).unwrap();
        });
        let start = Instant::now();

        // Act
        let result = SystemClock.sleep(Duration::from_secs(10), &cancel_rx);

        // Assert
        assert_eq!(result, Err(Cancelled));
        assert!(start.elapsed() < Duration::from_secs(5));
        canceller.join().unwrap();
    }

    #[test]
    fn test_dropped_sender_counts_as_cancelled() {
        // Arrange
        let (cancel_tx, cancel_rx) = unbounded::<()>();
        assert!(!is_cancelled(&cancel_rx));

        // Act
        drop(cancel_tx);

        // Assert
        assert!(is_cancelled(&cancel_rx));
        assert_eq!(
            SystemClock.sleep(Duration::from_secs(10), &cancel_rx),
            Err(Cancelled)
        );
    }
}
