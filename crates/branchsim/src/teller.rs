//! Teller task - the serving side of the per-teller handshake.
//!
//! The customer side (admission, teller selection, departure) is in
//! customer.rs.
//!
//! Each teller loops: wait at the window, check for shutdown, read the
//! assignment, run the transaction against the shared resources, signal
//! completion, clear the window, and return to the idle pool. Termination
//! comes only from the completion coordinator's broadcast.

use std::sync::Arc;

use crate::engine::BranchState;
use crate::lifecycle::TellerStatus;
use crate::types::{TellerId, TransactionKind};

pub(crate) async fn run_teller(state: Arc<BranchState>, id: TellerId) -> usize {
    tracing::info!(target: "branchsim::teller", teller = %id, "Ready to serve");
    state.pool.give(id);

    let mut served = 0usize;

    loop {
        state
            .teller_status
            .set(id.index(), TellerStatus::WaitingForCustomer);
        tracing::debug!(target: "branchsim::teller", teller = %id, "Waiting for a customer");
        state.handshakes[id.index()].customer_ready.wait().await;

        if state.completion.is_shutdown() {
            break;
        }

        let Some(assignment) = state.assignments.get(id) else {
            // Woken with nothing at the window: a shutdown-broadcast wake
            // that raced the flag check. Re-loop and look again.
            tracing::debug!(target: "branchsim::teller", teller = %id, "Spurious wake - no assignment");
            continue;
        };

        state.teller_status.set(id.index(), TellerStatus::Serving);
        tracing::info!(
            target: "branchsim::teller",
            teller = %id,
            customer = %assignment.customer,
            kind = %assignment.kind,
            "Serving customer"
        );

        perform_transaction(&state, assignment.kind).await;

        // Signal first, then clear: the customer observes completion before
        // the window is emptied, and no new customer can reach this teller
        // until the id is back in the pool.
        state.handshakes[id.index()].service_done.notify();
        state.assignments.clear(id);
        served += 1;

        tracing::debug!(
            target: "branchsim::teller",
            teller = %id,
            customer = %assignment.customer,
            "Transaction finished"
        );

        if !state.completion.is_shutdown() {
            state.pool.give(id);
        }
    }

    state.teller_status.set(id.index(), TellerStatus::Terminated);
    tracing::info!(target: "branchsim::teller", teller = %id, served, "Leaving for the day");
    served
}

/// Run one transaction's phase sequence against the shared resources.
///
/// A withdrawal releases the supervisor before requesting the vault, so at
/// most one resource lock is held at any time.
async fn perform_transaction(state: &BranchState, kind: TransactionKind) {
    let profile = &state.config.profile;

    tokio::time::sleep(profile.local_processing).await;

    match kind {
        TransactionKind::Deposit => {
            let _vault = state.resources.vault.hold().await;
            tokio::time::sleep(profile.vault_access).await;
        }
        TransactionKind::Withdrawal => {
            {
                let _supervisor = state.resources.supervisor.hold().await;
                tokio::time::sleep(profile.authorization).await;
            }
            let _vault = state.resources.vault.hold().await;
            tokio::time::sleep(profile.vault_access).await;
        }
    }
}
