//! Branch engine - wires the shared state and drives one full run.
//!
//! Flow:
//! 1. Validate configuration (every deadlock-shaped precondition)
//! 2. Build the shared state: gate, barrier, pool, table, handshakes,
//!    resources, coordinator
//! 3. Spawn S teller tasks and C customer tasks
//! 4. Join customers, fire the defensive shutdown broadcast, join tellers
//! 5. Assemble the run report

use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;

use crate::assignment::AssignmentTable;
use crate::barrier::ArrivalBarrier;
use crate::completion::CompletionCoordinator;
use crate::config::{BranchConfig, ConfigError};
use crate::customer::run_customer;
use crate::gate::AdmissionGate;
use crate::handshake::Handshake;
use crate::lifecycle::{CustomerStatus, StatusBoard, TellerStatus};
use crate::pool::TellerPool;
use crate::resources::SharedResources;
use crate::teller::run_teller;
use crate::types::{CustomerId, TellerId, TransactionKind};

/// Shared state handed by reference to every task at construction time.
/// Each entity carries its own exclusion primitive; none is ambient.
pub(crate) struct BranchState {
    pub(crate) config: BranchConfig,
    pub(crate) gate: AdmissionGate,
    pub(crate) barrier: ArrivalBarrier,
    pub(crate) pool: TellerPool,
    pub(crate) assignments: AssignmentTable,
    pub(crate) handshakes: Vec<Handshake>,
    pub(crate) resources: SharedResources,
    pub(crate) completion: CompletionCoordinator,
    pub(crate) teller_status: StatusBoard<TellerStatus>,
    pub(crate) customer_status: StatusBoard<CustomerStatus>,
}

/// Summary of one completed run. `customers_served` reaching the configured
/// customer count is the success criterion; the remaining fields expose the
/// invariant instrumentation.
#[derive(Debug, Clone, Serialize)]
pub struct BranchReport {
    pub customers_served: usize,
    pub peak_occupancy: usize,
    pub served_by_teller: Vec<usize>,
    pub vault_max_holders: usize,
    pub supervisor_max_holders: usize,
    pub teller_status: Vec<TellerStatus>,
    pub customer_status: Vec<CustomerStatus>,
}

/// A configured branch, ready to run once.
pub struct Branch {
    state: Arc<BranchState>,
    kinds: Vec<TransactionKind>,
}

impl Branch {
    /// Build a branch. `kinds` supplies one transaction kind per customer,
    /// decided by the caller before the protocol starts.
    pub fn new(config: BranchConfig, kinds: Vec<TransactionKind>) -> Result<Self, ConfigError> {
        config.validate()?;
        if kinds.len() != config.customers {
            return Err(ConfigError::KindCountMismatch {
                kinds: kinds.len(),
                customers: config.customers,
            });
        }

        let state = Arc::new(BranchState {
            gate: AdmissionGate::new(config.capacity),
            barrier: ArrivalBarrier::new(config.arrival_parties),
            pool: TellerPool::new(config.tellers),
            assignments: AssignmentTable::new(config.tellers),
            handshakes: Handshake::for_tellers(config.tellers),
            resources: SharedResources::new(),
            completion: CompletionCoordinator::new(config.customers),
            teller_status: StatusBoard::new(config.tellers),
            customer_status: StatusBoard::new(config.customers),
            config,
        });

        Ok(Self { state, kinds })
    }

    /// Run the branch to completion. Resolves only once every customer has
    /// departed and every teller has observed shutdown and exited.
    pub async fn run(self) -> BranchReport {
        let state = self.state;
        tracing::info!(
            customers = state.config.customers,
            tellers = state.config.tellers,
            capacity = state.config.capacity,
            "Opening branch"
        );

        let teller_tasks: Vec<_> = (0..state.config.tellers)
            .map(|i| {
                let state = Arc::clone(&state);
                tokio::spawn(run_teller(state, TellerId::new(i)))
            })
            .collect();

        let customer_tasks: Vec<_> = self
            .kinds
            .into_iter()
            .enumerate()
            .map(|(i, kind)| {
                let state = Arc::clone(&state);
                tokio::spawn(run_customer(state, CustomerId::new(i), kind))
            })
            .collect();

        for (i, result) in join_all(customer_tasks).await.into_iter().enumerate() {
            if let Err(e) = result {
                tracing::error!(customer = i, error = %e, "Customer task failed");
            }
        }

        // Safety net: every customer has returned, so the flag is already
        // set on any correct run. Re-broadcasting is idempotent and covers a
        // customer task that died before recording its departure.
        state.completion.broadcast_shutdown(&state.handshakes);

        let mut served_by_teller = vec![0usize; state.config.tellers];
        for (i, result) in join_all(teller_tasks).await.into_iter().enumerate() {
            match result {
                Ok(served) => served_by_teller[i] = served,
                Err(e) => tracing::error!(teller = i, error = %e, "Teller task failed"),
            }
        }

        tracing::info!(served = state.completion.served(), "Branch closed");

        BranchReport {
            customers_served: state.completion.served(),
            peak_occupancy: state.gate.peak_occupancy(),
            served_by_teller,
            vault_max_holders: state.resources.vault.max_holders(),
            supervisor_max_holders: state.resources.supervisor.max_holders(),
            teller_status: state.teller_status.snapshot(),
            customer_status: state.customer_status.snapshot(),
        }
    }
}
