//! Assignment table - exclusive teller-to-customer mapping.
//!
//! Written only by a customer before it signals its chosen teller, cleared
//! only by that teller after it signals completion. At most one entry per
//! teller at any time; a second write to an occupied slot is a broken
//! handshake invariant.

use std::sync::Mutex;

use crate::types::{CustomerId, TellerId, TransactionKind};

/// What a customer leaves at the teller window: who it is and which
/// transaction it wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub customer: CustomerId,
    pub kind: TransactionKind,
}

pub struct AssignmentTable {
    slots: Mutex<Vec<Option<Assignment>>>,
}

impl AssignmentTable {
    pub fn new(tellers: usize) -> Self {
        Self {
            slots: Mutex::new(vec![None; tellers]),
        }
    }

    /// Write a customer into a teller's slot. The slot must be empty.
    pub fn assign(&self, teller: TellerId, assignment: Assignment) {
        let mut slots = self.lock_slots();
        let slot = &mut slots[teller.index()];
        if let Some(previous) = slot {
            tracing::error!(
                teller = %teller,
                customer = %previous.customer,
                "Assignment slot already occupied - handshake invariant broken"
            );
            debug_assert!(false, "assignment slot already occupied");
        }
        *slot = Some(assignment);
    }

    /// Read a teller's current assignment without clearing it.
    pub fn get(&self, teller: TellerId) -> Option<Assignment> {
        self.lock_slots()[teller.index()]
    }

    /// Clear a teller's slot after service completes.
    pub fn clear(&self, teller: TellerId) {
        self.lock_slots()[teller.index()] = None;
    }

    /// Number of occupied slots. Instrumentation for tests.
    pub fn occupied(&self) -> usize {
        self.lock_slots().iter().filter(|s| s.is_some()).count()
    }

    fn lock_slots(&self) -> std::sync::MutexGuard<'_, Vec<Option<Assignment>>> {
        match self.slots.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::error!("Assignment table mutex poisoned - recovering");
                poisoned.into_inner()
            }
        }
    }
}
