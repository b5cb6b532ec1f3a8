//! Per-teller handshake signals.
//!
//! Each teller owns a pair of one-shot-per-cycle events: `customer_ready`
//! (customer has written its assignment and is at the window) and
//! `service_done` (transaction finished, customer may leave). The shutdown
//! broadcast may notify `customer_ready` extra times; a counting event
//! absorbs those harmlessly, so a semaphore is used rather than a oneshot.

use tokio::sync::Semaphore;

/// A binary/counting event, initialized to "not signaled".
pub struct Signal {
    permits: Semaphore,
}

impl Signal {
    pub fn new() -> Self {
        Self {
            permits: Semaphore::new(0),
        }
    }

    /// Signal the event. Never blocks; extra notifies accumulate.
    pub fn notify(&self) {
        self.permits.add_permits(1);
    }

    /// Block until the event has been signaled, consuming one notify.
    pub async fn wait(&self) {
        let permit = self
            .permits
            .acquire()
            .await
            .expect("signal semaphore is never closed");
        permit.forget();
    }
}

impl Default for Signal {
    fn default() -> Self {
        Self::new()
    }
}

/// The signal pair for one teller window.
pub struct Handshake {
    pub customer_ready: Signal,
    pub service_done: Signal,
}

impl Handshake {
    pub fn new() -> Self {
        Self {
            customer_ready: Signal::new(),
            service_done: Signal::new(),
        }
    }

    /// One handshake per teller, indexed by teller id.
    pub fn for_tellers(count: usize) -> Vec<Handshake> {
        (0..count).map(|_| Handshake::new()).collect()
    }
}

impl Default for Handshake {
    fn default() -> Self {
        Self::new()
    }
}
