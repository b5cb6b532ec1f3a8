//! Shared physical resources: the vault and the supervisor.
//!
//! Each is a binary mutual-exclusion lock held only for the duration of the
//! corresponding transaction phase. A withdrawal releases the supervisor
//! before requesting the vault, so no task ever holds both locks; there is
//! no lock ordering to invert.

use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{Mutex, MutexGuard};

/// A mutual-exclusion lock with concurrent-holder instrumentation.
pub struct ResourceLock {
    name: &'static str,
    inner: Mutex<()>,
    holders: AtomicUsize,
    max_holders: AtomicUsize,
}

impl ResourceLock {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            inner: Mutex::new(()),
            holders: AtomicUsize::new(0),
            max_holders: AtomicUsize::new(0),
        }
    }

    /// Block until the resource is free, then hold it until the guard drops.
    pub async fn hold(&self) -> ResourceGuard<'_> {
        let guard = self.inner.lock().await;
        let now = self.holders.fetch_add(1, Ordering::AcqRel) + 1;
        self.max_holders.fetch_max(now, Ordering::AcqRel);
        tracing::trace!(resource = self.name, "Resource acquired");
        ResourceGuard {
            lock: self,
            _guard: guard,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// High-water mark of concurrent holders. Must never exceed 1.
    pub fn max_holders(&self) -> usize {
        self.max_holders.load(Ordering::Acquire)
    }
}

pub struct ResourceGuard<'a> {
    lock: &'a ResourceLock,
    _guard: MutexGuard<'a, ()>,
}

impl Drop for ResourceGuard<'_> {
    fn drop(&mut self) {
        self.lock.holders.fetch_sub(1, Ordering::AcqRel);
        tracing::trace!(resource = self.lock.name, "Resource released");
    }
}

/// The branch's two contended resources.
pub struct SharedResources {
    pub vault: ResourceLock,
    pub supervisor: ResourceLock,
}

impl SharedResources {
    pub fn new() -> Self {
        Self {
            vault: ResourceLock::new("vault"),
            supervisor: ResourceLock::new("supervisor"),
        }
    }
}

impl Default for SharedResources {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn lock_is_exclusive() {
        let lock = Arc::new(ResourceLock::new("vault"));

        let held = lock.hold().await;

        let lock2 = Arc::clone(&lock);
        let contender = tokio::spawn(async move {
            let _guard = lock2.hold().await;
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(held);
        tokio::time::timeout(Duration::from_secs(1), contender)
            .await
            .expect("contender should acquire after release")
            .unwrap();
        assert_eq!(lock.max_holders(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn never_more_than_one_holder_under_contention() {
        let lock = Arc::new(ResourceLock::new("supervisor"));

        let mut tasks = Vec::new();
        for _ in 0..16 {
            let lock = Arc::clone(&lock);
            tasks.push(tokio::spawn(async move {
                let _guard = lock.hold().await;
                tokio::time::sleep(Duration::from_micros(500)).await;
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(lock.max_holders(), 1);
    }
}
