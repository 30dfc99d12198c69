/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::{debug, error, info};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{Builder, JoinHandle};
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::clock::Clock;
use crate::coordinator::{Assignment, Dispatch};
use crate::error::{Error, Result};
use crate::fleet::ElevatorRepository;
use crate::shared::ElevatorRequest;

/// What `submit` did with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// An elevator was idle and the coordinator handled the request.
    Dispatched(Assignment),
    /// Every elevator was busy; the request waits in the buffer.
    Queued,
}

/**
 * Entry point for floor requests.
 *
 * A request is dispatched right away when some elevator is idle and buffered
 * otherwise. A background drain loop retries buffered requests once per poll
 * interval, in arrival order, as long as an elevator is idle.
 *
 * # Fields
 * - `dispatcher`:      Assigns requests to elevators.
 * - `repository`:      Answers whether any elevator is idle.
 * - `clock`:           Stamps requests.
 * - `queue_tx`:        Producer side of the FIFO buffer.
 * - `queue_rx`:        Consumer side, shared with the drain loop.
 * - `in_flight`:       Requests taken off the buffer but not yet dispatched.
 * - `terminate_tx`:    Stops the drain loop.
 * - `drain_thread`:    Join handle of the drain loop, taken on shutdown.
 */
pub struct RequestIntake {
    dispatcher: Arc<dyn Dispatch>,
    repository: Arc<dyn ElevatorRepository>,
    clock: Arc<dyn Clock>,
    queue_tx: cbc::Sender<ElevatorRequest>,
    queue_rx: cbc::Receiver<ElevatorRequest>,
    in_flight: Arc<AtomicUsize>,
    terminate_tx: cbc::Sender<()>,
    drain_thread: Mutex<Option<JoinHandle<()>>>,
}

impl RequestIntake {
    /// Creates the intake and starts its drain loop.
    pub fn start(
        dispatcher: Arc<dyn Dispatch>,
        repository: Arc<dyn ElevatorRepository>,
        clock: Arc<dyn Clock>,
        poll_interval: Duration,
    ) -> Result<RequestIntake> {
        let (queue_tx, queue_rx) = cbc::unbounded::<ElevatorRequest>();
        let (terminate_tx, terminate_rx) = cbc::unbounded::<()>();
        let in_flight = Arc::new(AtomicUsize::new(0));

        let drain = DrainLoop {
            dispatcher: dispatcher.clone(),
            repository: repository.clone(),
            clock: clock.clone(),
            queue_rx: queue_rx.clone(),
            in_flight: in_flight.clone(),
            terminate_rx,
            poll_interval,
        };
        let drain_thread = Builder::new()
            .name("request_intake".into())
            .spawn(move || drain.run())?;

        Ok(RequestIntake {
            dispatcher,
            repository,
            clock,
            queue_tx,
            queue_rx,
            in_flight,
            terminate_tx,
            drain_thread: Mutex::new(Some(drain_thread)),
        })
    }

    /**
     * Accepts a request for `floor`. Never waits for an elevator.
     *
     * Failures while checking availability or dispatching are logged and
     * returned to the caller.
     */
    pub fn submit(&self, floor: i32) -> Result<Submission> {
        crate::event!("Request received for floor {}.", floor);
        let request = ElevatorRequest::new(floor, self.clock.now());

        let submission = self.route(request);
        match &submission {
            Ok(Submission::Dispatched(_)) => {
                crate::event!("Request processed for floor {}.", floor)
            }
            Ok(Submission::Queued) => crate::event!(
                "All elevators are occupied. Request for floor {} added to the queue.",
                floor
            ),
            Err(e) => error!("Failed to process request for floor {}: {}", floor, e),
        }
        submission
    }

    /// Number of requests waiting in the buffer.
    pub fn queued(&self) -> usize {
        self.queue_rx.len()
    }

    /// True when nothing is buffered and the drain loop is not in the middle
    /// of handing a request over.
    pub fn is_drained(&self) -> bool {
        // Buffer first: the drain loop marks a request in flight before
        // taking it off the buffer.
        self.queue_rx.is_empty() && self.in_flight.load(Ordering::SeqCst) == 0
    }

    /// Stops the drain loop and waits for it. Buffered requests are
    /// abandoned. Calling this again does nothing.
    pub fn shutdown(&self) {
        let handle = match self.drain_thread.lock() {
            Ok(mut drain_thread) => drain_thread.take(),
            Err(_) => {
                error!("Drain loop handle is unreachable");
                return;
            }
        };
        let Some(handle) = handle else {
            return;
        };

        let _ = self.terminate_tx.send(());
        if handle.join().is_err() {
            error!("Drain loop panicked");
        }
        if self.queued() > 0 {
            info!("Intake stopped with {} request(s) still queued", self.queued());
        }
    }

    fn route(&self, request: ElevatorRequest) -> Result<Submission> {
        if self.repository.is_any_idle()? {
            let assignment = self.dispatcher.assign(request)?;
            return Ok(Submission::Dispatched(assignment));
        }

        self.queue_tx
            .send(request)
            .map_err(|_| Error::InvalidOperation("request buffer is closed".to_string()))?;
        Ok(Submission::Queued)
    }
}

impl Drop for RequestIntake {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// State moved into the drain loop thread.
struct DrainLoop {
    dispatcher: Arc<dyn Dispatch>,
    repository: Arc<dyn ElevatorRepository>,
    clock: Arc<dyn Clock>,
    queue_rx: cbc::Receiver<ElevatorRequest>,
    in_flight: Arc<AtomicUsize>,
    terminate_rx: cbc::Receiver<()>,
    poll_interval: Duration,
}

impl DrainLoop {
    fn run(self) {
        debug!("Drain loop started");
        loop {
            if let Err(e) = self.drain() {
                error!("Drain loop iteration failed: {}", e);
            }
            if self
                .clock
                .sleep(self.poll_interval, &self.terminate_rx)
                .is_err()
            {
                break;
            }
        }
        debug!("Drain loop stopped");
    }

    /// Hands buffered requests to the dispatcher while an elevator is idle.
    fn drain(&self) -> Result<usize> {
        let mut dispatched = 0;
        while !self.queue_rx.is_empty() && self.repository.is_any_idle()? {
            self.in_flight.fetch_add(1, Ordering::SeqCst);
            let handed_over = self.hand_over();
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            if !handed_over? {
                break;
            }
            dispatched += 1;
        }
        Ok(dispatched)
    }

    fn hand_over(&self) -> Result<bool> {
        let Ok(request) = self.queue_rx.try_recv() else {
            return Ok(false);
        };
        let floor = request.requested_floor();
        let waited = self
            .clock
            .now()
            .saturating_duration_since(request.requested_at());

        self.dispatcher.assign(request)?;
        crate::event!(
            "Queued request processed for floor {} after {:.1?}.",
            floor, waited
        );
        Ok(true)
    }
}
