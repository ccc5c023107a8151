//! State API Comprehensive Test Suite
//!
//! End-to-end coverage of the orchestration surface, exercised the way an
//! orchestration backend would drive it:
//!
//! - **runs**: run creation, catalog reads, history
//! - **versioning**: optimistic locking, parent version checks
//! - **batches**: ordering, atomicity, the payload guard
//! - **slots**: concurrency admission, coercion, slot release
//! - **cancellation**: the cancel translation table
//!
//! Every test goes through the public `Gantry` facade; nothing reaches into
//! the storage crates directly.

pub use gantry::prelude::*;

mod batches;
mod cancellation;
mod runs;

// ===== Shared helpers =====

/// Fresh orchestrator plus a tenant and flow group to hang runs off.
pub fn harness() -> (Gantry, TenantId, FlowGroupId) {
    (Gantry::new(), TenantId::new(), FlowGroupId::new())
}

/// Create a flow run carrying the given concurrency labels.
///
/// The record comes back in `Scheduled`, ready for submission.
pub fn flow_with_labels(
    db: &Gantry,
    tenant: TenantId,
    group: FlowGroupId,
    labels: &[&str],
) -> RunRecord {
    db.runs
        .create_flow(tenant, group, labels.iter().map(|l| l.to_string()).collect())
        .unwrap()
}

/// Drive a run to `tag` with a bare one-item batch and return the verdict.
pub fn move_to(db: &Gantry, run_id: RunId, tag: StateTag) -> StateUpdate {
    db.states
        .set_one(TransitionRequest::new(run_id, StatePayload::new(tag)))
        .unwrap()
}
