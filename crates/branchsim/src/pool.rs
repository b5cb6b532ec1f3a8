//! Teller pool - bounded queue of currently-idle teller identifiers.
//!
//! Capacity equals the teller count and each id is returned at most once per
//! service cycle, so the queue can never legitimately overflow. `give` is
//! therefore non-blocking; an overflow indicates a broken handshake
//! invariant and is logged loudly.

use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{Mutex, mpsc};

use crate::types::TellerId;

pub struct TellerPool {
    idle_rx: Mutex<mpsc::Receiver<TellerId>>,
    idle_tx: mpsc::Sender<TellerId>,
    capacity: usize,
    idle_count: AtomicUsize,
}

impl TellerPool {
    /// Create an empty pool with room for `capacity` teller ids. Each teller
    /// inserts its own id once at startup.
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        Self {
            idle_rx: Mutex::new(rx),
            idle_tx: tx,
            capacity,
            idle_count: AtomicUsize::new(0),
        }
    }

    /// Block until an idle teller is available, remove it and return it.
    /// FIFO in practice; callers may not rely on any ordering.
    pub async fn take(&self) -> Option<TellerId> {
        let mut rx = self.idle_rx.lock().await;
        let id = rx.recv().await?;
        self.idle_count.fetch_sub(1, Ordering::Release);
        Some(id)
    }

    /// Return a teller id to the pool without blocking.
    pub fn give(&self, id: TellerId) {
        if self.idle_tx.try_send(id).is_err() {
            // Capacity equals teller count, so this can only mean an id was
            // returned twice in one cycle.
            tracing::error!(teller = %id, "Idle pool full - teller id dropped");
            debug_assert!(false, "teller id returned to a full pool");
        } else {
            self.idle_count.fetch_add(1, Ordering::Release);
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn idle(&self) -> usize {
        self.idle_count.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn give_then_take_round_trips() {
        let pool = TellerPool::new(2);

        pool.give(TellerId::new(0));
        pool.give(TellerId::new(1));
        assert_eq!(pool.idle(), 2);

        let first = pool.take().await.unwrap();
        assert_eq!(first, TellerId::new(0));
        assert_eq!(pool.idle(), 1);
    }

    #[tokio::test]
    async fn take_blocks_until_give() {
        let pool = Arc::new(TellerPool::new(1));

        let pool2 = Arc::clone(&pool);
        let taker = tokio::spawn(async move { pool2.take().await });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!taker.is_finished());

        pool.give(TellerId::new(0));
        let taken = tokio::time::timeout(Duration::from_secs(1), taker)
            .await
            .expect("take should complete once an id is given")
            .unwrap();
        assert_eq!(taken, Some(TellerId::new(0)));
    }

    #[tokio::test]
    #[cfg_attr(debug_assertions, should_panic(expected = "full pool"))]
    async fn give_on_full_pool_fails_loudly() {
        let pool = TellerPool::new(1);
        pool.give(TellerId::new(0));
        pool.give(TellerId::new(0));
    }
}
