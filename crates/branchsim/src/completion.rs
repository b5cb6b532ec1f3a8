//! Completion coordinator - detects when every customer has been served and
//! broadcasts shutdown to the tellers.
//!
//! The served counter is the sole termination trigger: the departure that
//! brings it to the total sets the shutdown flag, and only then wakes every
//! teller (flag-then-signal, never the reverse, so a racing teller cannot
//! observe a wake without the flag). Extra broadcasts are idempotent.

use std::sync::Mutex;

use tokio_util::sync::CancellationToken;

use crate::handshake::Handshake;

pub struct CompletionCoordinator {
    served: Mutex<usize>,
    total: usize,
    shutdown: CancellationToken,
}

impl CompletionCoordinator {
    pub fn new(total: usize) -> Self {
        Self {
            served: Mutex::new(0),
            total,
            shutdown: CancellationToken::new(),
        }
    }

    /// Record one customer departure. If this was the last one, sets the
    /// shutdown flag and wakes every teller.
    ///
    /// Returns true for the departure that completed the run.
    pub fn record_departure(&self, handshakes: &[Handshake]) -> bool {
        let last = {
            let mut served = self.lock_served();
            *served += 1;
            debug_assert!(*served <= self.total, "served count exceeded total");
            if *served == self.total {
                // Flag before signals: a teller woken by the broadcast must
                // observe the flag already set.
                self.shutdown.cancel();
                true
            } else {
                false
            }
        };

        if last {
            tracing::info!(total = self.total, "All customers served - closing branch");
            for handshake in handshakes {
                handshake.customer_ready.notify();
            }
        }
        last
    }

    /// Defensive shutdown broadcast. Safe to call any number of times after
    /// completion; the flag transition happens at most once and extra wakes
    /// are absorbed by the counting signals.
    pub fn broadcast_shutdown(&self, handshakes: &[Handshake]) {
        self.shutdown.cancel();
        for handshake in handshakes {
            handshake.customer_ready.notify();
        }
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    pub fn served(&self) -> usize {
        *self.lock_served()
    }

    pub fn total(&self) -> usize {
        self.total
    }

    fn lock_served(&self) -> std::sync::MutexGuard<'_, usize> {
        match self.served.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::error!("Served counter mutex poisoned - recovering");
                poisoned.into_inner()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shutdown_fires_exactly_at_total() {
        let handshakes = Handshake::for_tellers(2);
        let coordinator = CompletionCoordinator::new(3);

        assert!(!coordinator.record_departure(&handshakes));
        assert!(!coordinator.is_shutdown());

        assert!(!coordinator.record_departure(&handshakes));
        assert!(!coordinator.is_shutdown());

        assert!(coordinator.record_departure(&handshakes));
        assert!(coordinator.is_shutdown());
        assert_eq!(coordinator.served(), 3);
    }

    #[tokio::test]
    async fn final_departure_wakes_every_teller() {
        let handshakes = Handshake::for_tellers(3);
        let coordinator = CompletionCoordinator::new(1);

        coordinator.record_departure(&handshakes);

        for handshake in &handshakes {
            handshake.customer_ready.wait().await;
        }
    }

    #[tokio::test]
    async fn extra_broadcast_is_idempotent() {
        let handshakes = Handshake::for_tellers(2);
        let coordinator = CompletionCoordinator::new(1);

        coordinator.record_departure(&handshakes);
        coordinator.broadcast_shutdown(&handshakes);
        coordinator.broadcast_shutdown(&handshakes);

        assert!(coordinator.is_shutdown());
        assert_eq!(coordinator.served(), 1);
    }
}
