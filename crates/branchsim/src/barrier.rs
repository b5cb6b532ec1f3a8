//! Arrival barrier - one-shot rendezvous over the customer population.
//!
//! All customers announce themselves here and none proceeds toward the
//! branch until every party has arrived. The party count must equal the
//! customer count; that precondition is enforced by config validation, not
//! here (see `BranchConfig::validate`).

use tokio::sync::Barrier;

pub struct ArrivalBarrier {
    inner: Barrier,
    parties: usize,
}

impl ArrivalBarrier {
    pub fn new(parties: usize) -> Self {
        Self {
            inner: Barrier::new(parties),
            parties,
        }
    }

    /// Block until all parties have called `wait`. Each customer calls this
    /// exactly once; the barrier is not reused after the single wave.
    ///
    /// Returns true for the one caller that completed the rendezvous.
    pub async fn wait(&self) -> bool {
        self.inner.wait().await.is_leader()
    }

    pub fn parties(&self) -> usize {
        self.parties
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn releases_all_parties_together() {
        let barrier = Arc::new(ArrivalBarrier::new(5));
        let released = Arc::new(AtomicUsize::new(0));

        let mut tasks = Vec::new();
        for _ in 0..5 {
            let barrier = Arc::clone(&barrier);
            let released = Arc::clone(&released);
            tasks.push(tokio::spawn(async move {
                barrier.wait().await;
                released.fetch_add(1, Ordering::SeqCst);
            }));
        }

        for task in tasks {
            tokio::time::timeout(Duration::from_secs(1), task)
                .await
                .expect("barrier should release once all parties arrive")
                .unwrap();
        }
        assert_eq!(released.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn holds_until_last_party_arrives() {
        let barrier = Arc::new(ArrivalBarrier::new(2));

        let barrier2 = Arc::clone(&barrier);
        let waiter = tokio::spawn(async move {
            barrier2.wait().await;
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        barrier.wait().await;
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
    }
}
