//! Branch configuration and construction-time validation.
//!
//! Every precondition that would otherwise manifest as a permanent deadlock
//! (arrival-barrier party mismatch, capacity out of range) is rejected here,
//! before any task is spawned.

use std::time::Duration;

/// Simulated-work delays for the phases of a visit. Opaque durations, not
/// part of synchronization correctness; tests run with the zero profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkProfile {
    /// Customer travel from the barrier to the branch door.
    pub travel: Duration,
    /// Teller-local processing before touching any shared resource.
    pub local_processing: Duration,
    /// Time holding the supervisor lock (withdrawal authorization).
    pub authorization: Duration,
    /// Time holding the vault lock.
    pub vault_access: Duration,
}

impl WorkProfile {
    /// All-zero profile. The protocol must terminate with no delays at all.
    pub fn zero() -> Self {
        Self {
            travel: Duration::ZERO,
            local_processing: Duration::ZERO,
            authorization: Duration::ZERO,
            vault_access: Duration::ZERO,
        }
    }
}

impl Default for WorkProfile {
    fn default() -> Self {
        Self {
            travel: Duration::from_millis(5),
            local_processing: Duration::from_millis(10),
            authorization: Duration::from_millis(15),
            vault_access: Duration::from_millis(20),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("customer count must be at least 1")]
    NoCustomers,
    #[error("teller count must be at least 1")]
    NoTellers,
    #[error("branch capacity {capacity} out of range (must be 1..={customers})")]
    CapacityOutOfRange { capacity: usize, customers: usize },
    #[error("arrival barrier configured for {parties} parties but {customers} customers will wait")]
    ArrivalPartyMismatch { parties: usize, customers: usize },
    #[error("expected {customers} transaction kinds, got {kinds}")]
    KindCountMismatch { kinds: usize, customers: usize },
}

/// Configuration for one branch run.
#[derive(Debug, Clone)]
pub struct BranchConfig {
    pub customers: usize,
    pub tellers: usize,
    pub capacity: usize,
    /// Party count for the arrival barrier. Must equal `customers`; any
    /// other value would deadlock the rendezvous permanently, so it is
    /// rejected by [`BranchConfig::validate`] instead.
    pub arrival_parties: usize,
    pub profile: WorkProfile,
}

impl BranchConfig {
    pub fn new(customers: usize, tellers: usize, capacity: usize) -> Self {
        Self {
            customers,
            tellers,
            capacity,
            arrival_parties: customers,
            profile: WorkProfile::default(),
        }
    }

    pub fn with_arrival_parties(mut self, parties: usize) -> Self {
        self.arrival_parties = parties;
        self
    }

    pub fn with_profile(mut self, profile: WorkProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.customers == 0 {
            return Err(ConfigError::NoCustomers);
        }
        if self.tellers == 0 {
            return Err(ConfigError::NoTellers);
        }
        if self.capacity == 0 || self.capacity > self.customers {
            return Err(ConfigError::CapacityOutOfRange {
                capacity: self.capacity,
                customers: self.customers,
            });
        }
        if self.arrival_parties != self.customers {
            return Err(ConfigError::ArrivalPartyMismatch {
                parties: self.arrival_parties,
                customers: self.customers,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_config_passes() {
        assert!(BranchConfig::new(10, 3, 2).validate().is_ok());
    }

    #[test]
    fn single_customer_single_teller_passes() {
        assert!(BranchConfig::new(1, 1, 1).validate().is_ok());
    }

    #[test]
    fn zero_counts_rejected() {
        assert!(matches!(
            BranchConfig::new(0, 3, 2).validate(),
            Err(ConfigError::NoCustomers)
        ));
        assert!(matches!(
            BranchConfig::new(10, 0, 2).validate(),
            Err(ConfigError::NoTellers)
        ));
    }

    #[test]
    fn capacity_must_not_exceed_customers() {
        assert!(matches!(
            BranchConfig::new(2, 1, 3).validate(),
            Err(ConfigError::CapacityOutOfRange { capacity: 3, .. })
        ));
        assert!(matches!(
            BranchConfig::new(2, 1, 0).validate(),
            Err(ConfigError::CapacityOutOfRange { capacity: 0, .. })
        ));
    }

    #[test]
    fn barrier_party_mismatch_rejected() {
        // The silent-deadlock trap from the reference design: a barrier
        // waiting for a different party count than the customer population.
        let err = BranchConfig::new(5, 1, 5)
            .with_arrival_parties(3)
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ArrivalPartyMismatch {
                parties: 3,
                customers: 5
            }
        ));
    }
}
