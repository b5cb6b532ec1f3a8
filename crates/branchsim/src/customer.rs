//! Customer task - the visiting side of the protocol.
//!
//! Flow: rendezvous at the arrival barrier, pass the admission gate, draw a
//! teller from the idle pool, leave the assignment at the window, signal the
//! teller, wait for service, release the gate slot, record the departure.

use std::sync::Arc;

use crate::assignment::Assignment;
use crate::engine::BranchState;
use crate::lifecycle::CustomerStatus;
use crate::types::{CustomerId, TransactionKind};

pub(crate) async fn run_customer(state: Arc<BranchState>, id: CustomerId, kind: TransactionKind) {
    tracing::info!(
        target: "branchsim::customer",
        customer = %id,
        kind = %kind,
        "Wants to perform a transaction"
    );

    state.customer_status.set(id.index(), CustomerStatus::AtBarrier);
    state.barrier.wait().await;

    tokio::time::sleep(state.config.profile.travel).await;

    state.gate.enter().await;
    state.customer_status.set(id.index(), CustomerStatus::Admitted);
    tracing::debug!(target: "branchsim::customer", customer = %id, "Entered the branch");

    let Some(teller) = state.pool.take().await else {
        // Unreachable while the pool is alive; bail rather than hang the run.
        tracing::error!(customer = %id, "Teller pool closed unexpectedly");
        state.gate.leave();
        return;
    };

    state.assignments.assign(teller, Assignment { customer: id, kind });
    state.customer_status.set(id.index(), CustomerStatus::Assigned);
    tracing::debug!(
        target: "branchsim::customer",
        customer = %id,
        teller = %teller,
        "Selected a teller"
    );

    state.handshakes[teller.index()].customer_ready.notify();
    state.customer_status.set(id.index(), CustomerStatus::InService);

    state.handshakes[teller.index()].service_done.wait().await;

    state.gate.leave();
    state.customer_status.set(id.index(), CustomerStatus::Departed);
    tracing::debug!(target: "branchsim::customer", customer = %id, "Left the branch");

    state.completion.record_departure(&state.handshakes);
}
