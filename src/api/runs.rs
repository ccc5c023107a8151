//! Run catalog operations.
//!
//! The Runs surface creates flow and task runs and reads records and
//! their transition history. Records are mutated exclusively through the
//! [`States`](crate::States) surface.

use crate::error::Result;
use crate::types::{FlowGroupId, Label, RunId, RunRecord, RunStateHistoryEntry, StateTag, TenantId};
use gantry_engine::Engine;
use std::sync::Arc;

/// Run catalog operations.
///
/// Access via `db.runs`.
pub struct Runs {
    engine: Arc<Engine>,
}

impl Runs {
    pub(crate) fn new(engine: Arc<Engine>) -> Self {
        Self { engine }
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Create a flow run.
    ///
    /// The run is created `Pending` and scheduled in the same transaction;
    /// the returned record is at version 2 with tag `Scheduled`.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let flow = db.runs.create_flow(tenant, group, vec!["db".into()])?;
    /// assert_eq!(flow.state, StateTag::Scheduled);
    /// ```
    pub fn create_flow(
        &self,
        tenant: TenantId,
        flow_group: FlowGroupId,
        labels: Vec<Label>,
    ) -> Result<RunRecord> {
        self.engine.create_flow_run(tenant, flow_group, labels)
    }

    /// Create a task run under an existing flow run.
    ///
    /// The tenant and flow group are inherited from the parent. The returned
    /// record is at version 1 with tag `Pending`.
    pub fn create_task(&self, parent: RunId, labels: Vec<Label>) -> Result<RunRecord> {
        self.engine.create_task_run(parent, labels)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Fetch a run record.
    pub fn get(&self, run_id: &RunId) -> Result<RunRecord> {
        self.engine.get_run(run_id)
    }

    /// Check if a run exists.
    pub fn exists(&self, run_id: &RunId) -> bool {
        self.engine.get_run(run_id).is_ok()
    }

    /// List all runs, oldest first.
    pub fn list(&self) -> Vec<RunRecord> {
        self.engine.list_runs()
    }

    /// List runs currently in `state`, oldest first.
    pub fn list_by_state(&self, state: StateTag) -> Vec<RunRecord> {
        self.engine.list_runs_by_state(state)
    }

    /// Full transition history of a run, oldest first.
    ///
    /// History is append-only; the last entry always agrees with the
    /// record's current `(version, state)`.
    pub fn history(&self, run_id: &RunId) -> Vec<RunStateHistoryEntry> {
        self.engine.run_history(run_id)
    }
}
