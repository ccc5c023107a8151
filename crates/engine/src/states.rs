//! Batch transition application and cancellation
//!
//! The externally visible write path: screen the batch's payload sizes,
//! take the gate, decide and stage every item in order, then commit the
//! whole batch or roll all of it back. A batch is never partially applied;
//! the caller sees either one status per item or the first error.

use crate::admission;
use crate::payload;
use crate::transitions::{self, CancelAction, Decision};
use crate::Engine;
use gantry_concurrency::TransitionTxn;
use gantry_core::error::{EngineError, Result};
use gantry_core::request::{StateUpdate, TransitionRequest};
use gantry_core::run::RunRecord;
use gantry_core::state::{StatePayload, StateTag};
use gantry_core::types::{RunId, RunKind};

impl Engine {
    /// Apply an ordered batch of transition requests as one transaction
    ///
    /// Items are decided in submission order against a staged view that
    /// includes earlier items' effects, so a batch may move the same run
    /// twice. Any rejection (version conflict, parent mismatch, malformed
    /// item, unknown run) aborts the whole batch and mutates nothing,
    /// including items that had already validated.
    ///
    /// On full success the response carries one status per item, in order:
    /// `SUCCESS` for applied (or terminally re-asserted) items, `QUEUED`
    /// for a `Running` target coerced by slot exhaustion, `NOOP` for items
    /// that changed nothing.
    pub fn set_states(&self, requests: &[TransitionRequest]) -> Result<Vec<StateUpdate>> {
        payload::check_requests(requests, self.config().max_state_payload_bytes)?;

        let _guard = self.gate.lock();
        let mut txn = TransitionTxn::new(&self.runs, &self.history, &self.slots);
        match self.apply_batch(&mut txn, requests) {
            Ok(updates) => {
                self.gate.commit(txn);
                Ok(updates)
            }
            Err(e) => {
                self.gate.abort(txn);
                tracing::debug!(error = %e, "state batch rejected");
                Err(e)
            }
        }
    }

    /// Request cancellation of a run
    ///
    /// Idempotent: always returns the resulting state for a known run.
    /// `Running` runs wind down through `Cancelling`; runs that have not
    /// started go straight to `Cancelled` and give back any held slot;
    /// finished runs are returned unchanged with no version bump.
    pub fn cancel_run(&self, run_id: RunId) -> Result<StatePayload> {
        let _guard = self.gate.lock();
        let mut txn = TransitionTxn::new(&self.runs, &self.history, &self.slots);
        match self.apply_cancel(&mut txn, run_id) {
            Ok(state) => {
                self.gate.commit(txn);
                Ok(state)
            }
            Err(e) => {
                self.gate.abort(txn);
                Err(e)
            }
        }
    }

    fn apply_batch(
        &self,
        txn: &mut TransitionTxn<'_>,
        requests: &[TransitionRequest],
    ) -> Result<Vec<StateUpdate>> {
        let mut updates = Vec::with_capacity(requests.len());
        for request in requests {
            updates.push(self.apply_item(txn, request)?);
        }
        Ok(updates)
    }

    fn apply_item(
        &self,
        txn: &mut TransitionTxn<'_>,
        request: &TransitionRequest,
    ) -> Result<StateUpdate> {
        let record = txn
            .run(&request.run_id)
            .ok_or(EngineError::RunNotFound(request.run_id))?;

        // Correctness gates run before any outcome logic: a conflicting
        // item must abort the batch even if the transition itself would
        // have been a no-op.
        self.check_own_version(&record, request)?;
        self.check_parent_version(txn, &record, request)?;

        match transitions::decide(txn, &record, &request.state) {
            Decision::Accept => {
                stage_applied(txn, &record, &request.state)?;
                Ok(StateUpdate::success(record.id))
            }
            Decision::CoerceQueued { reason } => {
                tracing::debug!(
                    run_id = %record.id,
                    requested = %request.state.tag,
                    "slot denied, parking run"
                );
                let queued = StatePayload::new(StateTag::Queued).with_message(reason);
                stage_applied(txn, &record, &queued)?;
                Ok(StateUpdate::queued(record.id))
            }
            Decision::Reassert => Ok(StateUpdate::success(record.id)),
            Decision::Ignore { reason } => {
                tracing::debug!(
                    run_id = %record.id,
                    requested = %request.state.tag,
                    reason = %reason,
                    "transition ignored"
                );
                Ok(StateUpdate::noop(record.id, reason))
            }
        }
    }

    /// Compare the item's expected version against the stored version
    ///
    /// Only when the owning flow group has version locking enabled; with
    /// locking off the expectation is accepted unconditionally, which lets
    /// relaxed callers race last-writer-wins without version bookkeeping.
    fn check_own_version(&self, record: &RunRecord, request: &TransitionRequest) -> Result<()> {
        if !self.groups.get(&record.flow_group).version_locking_enabled {
            return Ok(());
        }
        let Some(expected) = request.expected_version else {
            return Ok(());
        };
        if expected != record.version {
            return Err(EngineError::VersionConflict {
                kind: record.kind,
                run_id: record.id,
                expected,
                stored: record.version,
            });
        }
        Ok(())
    }

    /// Enforce an expected parent-flow-run version on a task run item
    ///
    /// Enforced whenever supplied, independent of the group's locking
    /// setting and of the task run's own version check.
    fn check_parent_version(
        &self,
        txn: &TransitionTxn<'_>,
        record: &RunRecord,
        request: &TransitionRequest,
    ) -> Result<()> {
        let Some(expected) = request.parent_version_check else {
            return Ok(());
        };
        let parent_id = match (record.kind, record.parent) {
            (RunKind::Task, Some(parent_id)) => parent_id,
            _ => {
                return Err(EngineError::InvalidStateShape {
                    kind: record.kind,
                    run_id: record.id,
                    reason: "a parent version check applies only to task runs".to_string(),
                });
            }
        };
        let parent = txn
            .run(&parent_id)
            .ok_or(EngineError::RunNotFound(parent_id))?;
        if parent.version != expected {
            return Err(EngineError::ParentVersionMismatch {
                run_id: record.id,
                expected,
                stored: parent.version,
            });
        }
        Ok(())
    }

    fn apply_cancel(&self, txn: &mut TransitionTxn<'_>, run_id: RunId) -> Result<StatePayload> {
        let record = txn.run(&run_id).ok_or(EngineError::RunNotFound(run_id))?;
        match transitions::decide_cancel(&record) {
            // Already winding down or finished; report the stored state.
            CancelAction::Unchanged => record.decode_state(),
            CancelAction::Transition(tag) => {
                let message = if tag == StateTag::Cancelling {
                    "cancellation requested"
                } else {
                    "run cancelled"
                };
                let payload = StatePayload::new(tag).with_message(message);
                stage_applied(txn, &record, &payload)?;
                tracing::debug!(
                    run_id = %run_id,
                    from = %record.state,
                    to = %tag,
                    "cancel translated"
                );
                Ok(payload)
            }
        }
    }
}

/// Stage an applied transition, releasing slots the run walks away from
fn stage_applied(
    txn: &mut TransitionTxn<'_>,
    record: &RunRecord,
    payload: &StatePayload,
) -> Result<RunRecord> {
    let next = txn.stage_transition(record, payload)?;
    if record.state.occupies_slot() && !next.state.occupies_slot() {
        admission::release_slots(txn, record);
    }
    Ok(next)
}
