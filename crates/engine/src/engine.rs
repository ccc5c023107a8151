//! Engine assembly, run catalog, and configuration surfaces
//!
//! Everything that creates or reads catalog objects lives here; the batch
//! transition path is in the sibling `states` module. Reads go straight to
//! storage without taking the gate, writes serialize through it.

use crate::config::EngineConfig;
use gantry_concurrency::{TransitionTxn, TxnGate};
use gantry_core::error::{EngineError, Result};
use gantry_core::run::{ConcurrencyLimit, FlowGroupSettings, RunRecord, RunStateHistoryEntry};
use gantry_core::state::{StatePayload, StateTag};
use gantry_core::types::{FlowGroupId, Label, RunId, RunKind, TenantId};
use gantry_storage::{FlowGroupTable, HistoryStore, RunTable, SlotTable};

/// The run-state orchestration engine
///
/// Owns the run catalog, the state history, the slot counters, and the
/// per-group settings, and mediates every mutation through one transaction
/// gate. Cheap to share behind an `Arc`; all methods take `&self`.
pub struct Engine {
    config: EngineConfig,
    pub(crate) runs: RunTable,
    pub(crate) history: HistoryStore,
    pub(crate) slots: SlotTable,
    pub(crate) groups: FlowGroupTable,
    pub(crate) gate: TxnGate,
}

impl Engine {
    /// Engine with default configuration
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Engine with explicit configuration
    pub fn with_config(config: EngineConfig) -> Self {
        Engine {
            config,
            runs: RunTable::new(),
            history: HistoryStore::new(),
            slots: SlotTable::new(),
            groups: FlowGroupTable::new(),
            gate: TxnGate::new(),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ===== Run catalog =====

    /// Create a flow run
    ///
    /// The record is born `Pending` and immediately scheduled in the same
    /// transaction, so the first version a caller observes is 2 with tag
    /// `Scheduled`, with both steps in the history.
    pub fn create_flow_run(
        &self,
        tenant: TenantId,
        flow_group: FlowGroupId,
        labels: Vec<Label>,
    ) -> Result<RunRecord> {
        let _guard = self.gate.lock();
        let mut txn = TransitionTxn::new(&self.runs, &self.history, &self.slots);

        let pending = StatePayload::new(StateTag::Pending);
        let record = RunRecord::create(
            RunId::new(),
            tenant,
            flow_group,
            RunKind::Flow,
            None,
            labels,
            &pending,
        );
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                self.gate.abort(txn);
                return Err(e);
            }
        };
        txn.stage_history(RunStateHistoryEntry::record(
            record.id,
            record.tenant,
            record.version,
            &pending,
        ));
        txn.stage_run(record.clone());

        let scheduled = StatePayload::new(StateTag::Scheduled);
        match txn.stage_transition(&record, &scheduled) {
            Ok(scheduled_record) => {
                self.gate.commit(txn);
                tracing::debug!(run_id = %scheduled_record.id, "created flow run");
                Ok(scheduled_record)
            }
            Err(e) => {
                self.gate.abort(txn);
                Err(e)
            }
        }
    }

    /// Create a task run under an existing flow run
    ///
    /// The tenant and flow group are inherited from the parent. Task runs
    /// are born `Pending` at version 1 and stay there until an agent moves
    /// them.
    pub fn create_task_run(&self, parent: RunId, labels: Vec<Label>) -> Result<RunRecord> {
        let _guard = self.gate.lock();
        let mut txn = TransitionTxn::new(&self.runs, &self.history, &self.slots);

        match self.stage_task_run(&mut txn, parent, labels) {
            Ok(record) => {
                self.gate.commit(txn);
                tracing::debug!(run_id = %record.id, parent = %parent, "created task run");
                Ok(record)
            }
            Err(e) => {
                self.gate.abort(txn);
                Err(e)
            }
        }
    }

    fn stage_task_run(
        &self,
        txn: &mut TransitionTxn<'_>,
        parent: RunId,
        labels: Vec<Label>,
    ) -> Result<RunRecord> {
        let parent_record = txn.run(&parent).ok_or(EngineError::RunNotFound(parent))?;
        if parent_record.kind != RunKind::Flow {
            return Err(EngineError::Internal(format!(
                "parent of a task run must be a flow run, {parent} is a {} run",
                parent_record.kind
            )));
        }

        let pending = StatePayload::new(StateTag::Pending);
        let record = RunRecord::create(
            RunId::new(),
            parent_record.tenant,
            parent_record.flow_group,
            RunKind::Task,
            Some(parent),
            labels,
            &pending,
        )?;
        txn.stage_history(RunStateHistoryEntry::record(
            record.id,
            record.tenant,
            record.version,
            &pending,
        ));
        txn.stage_run(record.clone());
        Ok(record)
    }

    /// Fetch a run record
    pub fn get_run(&self, run_id: &RunId) -> Result<RunRecord> {
        self.runs.get(run_id).ok_or(EngineError::RunNotFound(*run_id))
    }

    /// All runs, oldest first
    pub fn list_runs(&self) -> Vec<RunRecord> {
        self.runs.list()
    }

    /// All runs currently in `state`, oldest first
    pub fn list_runs_by_state(&self, state: StateTag) -> Vec<RunRecord> {
        self.runs.list_by_state(state)
    }

    /// Full transition history of a run, oldest first
    pub fn run_history(&self, run_id: &RunId) -> Vec<RunStateHistoryEntry> {
        self.history.entries(run_id)
    }

    // ===== Flow group settings =====

    /// Settings for a flow group (defaults when never configured)
    pub fn group_settings(&self, group: &FlowGroupId) -> FlowGroupSettings {
        self.groups.get(group)
    }

    /// Turn optimistic version locking on or off for a flow group
    pub fn set_version_locking(&self, group: FlowGroupId, enabled: bool) {
        let _guard = self.gate.lock();
        self.groups.set_version_locking(group, enabled);
    }

    // ===== Concurrency limits =====

    /// Create or resize the limit for a label
    ///
    /// Resizing keeps current occupants even if that leaves the label
    /// over-subscribed; the excess drains as runs leave `Submitted` and
    /// `Running`.
    pub fn set_concurrency_limit(&self, label: impl Into<Label>, capacity: usize) {
        let _guard = self.gate.lock();
        self.slots.set_limit(label, capacity);
    }

    /// Drop the limit for a label, returning whether one existed
    ///
    /// The label becomes unlimited immediately; slot bookkeeping for its
    /// current occupants is discarded.
    pub fn remove_concurrency_limit(&self, label: &str) -> bool {
        let _guard = self.gate.lock();
        self.slots.remove_limit(label)
    }

    /// Configured limit for a label, if any
    pub fn concurrency_limit(&self, label: &str) -> Option<ConcurrencyLimit> {
        self.slots.get_limit(label)
    }

    /// All configured limits, sorted by label
    pub fn list_concurrency_limits(&self) -> Vec<ConcurrencyLimit> {
        self.slots.list_limits()
    }

    /// Number of slots currently occupied for a label
    pub fn occupied_slots(&self, label: &str) -> usize {
        self.slots.occupant_count(label)
    }

    // ===== Observability =====

    /// Counters for the engine's transaction gate and catalog
    pub fn metrics(&self) -> EngineMetrics {
        EngineMetrics {
            transactions_committed: self.gate.committed(),
            transactions_aborted: self.gate.aborted(),
            operations: self.gate.committed() + self.gate.aborted(),
            runs: self.runs.len(),
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// Engine counters
#[derive(Debug, Clone)]
pub struct EngineMetrics {
    /// Transactions committed since startup
    pub transactions_committed: u64,
    /// Transactions aborted since startup
    pub transactions_aborted: u64,
    /// Total transactions (commits plus aborts)
    pub operations: u64,
    /// Run records currently in the catalog
    pub runs: usize,
}
