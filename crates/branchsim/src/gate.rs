//! Admission gate - bounded occupancy of the branch floor.
//!
//! A counting semaphore with no ownership transfer: any task's `leave` may
//! match any other task's `enter`, so permits are forgotten on entry and
//! re-added on exit rather than held as RAII guards.

use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Semaphore;

pub struct AdmissionGate {
    slots: Semaphore,
    capacity: usize,
    occupancy: AtomicUsize,
    peak: AtomicUsize,
}

impl AdmissionGate {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Semaphore::new(capacity),
            capacity,
            occupancy: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    /// Block until an occupancy slot is free, then take it.
    pub async fn enter(&self) {
        let permit = self
            .slots
            .acquire()
            .await
            .expect("admission gate semaphore is never closed");
        permit.forget();

        let now = self.occupancy.fetch_add(1, Ordering::AcqRel) + 1;
        self.peak.fetch_max(now, Ordering::AcqRel);
    }

    /// Free one occupancy slot, waking one waiter if any.
    pub fn leave(&self) {
        self.occupancy.fetch_sub(1, Ordering::AcqRel);
        self.slots.add_permits(1);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn occupancy(&self) -> usize {
        self.occupancy.load(Ordering::Acquire)
    }

    /// High-water mark of concurrent occupants. Instrumentation for tests;
    /// must never exceed `capacity`.
    pub fn peak_occupancy(&self) -> usize {
        self.peak.load(Ordering::Acquire)
    }
}
