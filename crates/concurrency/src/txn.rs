//! Staged transaction over the run catalog
//!
//! A [`TransitionTxn`] buffers every mutation a batch produces: replacement
//! run images, history entries, and slot reservations and releases. Nothing
//! touches storage until [`TransitionTxn::commit`]; dropping or aborting the
//! transaction leaves storage exactly as it was.
//!
//! Reads through the transaction see staged writes first, so a batch that
//! transitions the same run twice decides the second item against the image
//! the first item produced.

use gantry_core::error::Result;
use gantry_core::run::{RunRecord, RunStateHistoryEntry};
use gantry_core::state::StatePayload;
use gantry_core::types::{Label, RunId};
use gantry_storage::{HistoryStore, RunTable, SlotTable};
use rustc_hash::{FxHashMap, FxHashSet};

/// Buffered mutations for one transition batch
///
/// Holds at most one staged image per run (later stages replace earlier
/// ones) and any number of history entries, applied in staging order.
/// Slot deltas are tracked per label as reserve and release sets; a run
/// moves between the two sets rather than appearing in both.
pub struct TransitionTxn<'a> {
    runs: &'a RunTable,
    history: &'a HistoryStore,
    slots: &'a SlotTable,
    staged_runs: FxHashMap<RunId, RunRecord>,
    staged_history: Vec<RunStateHistoryEntry>,
    reserved: FxHashMap<Label, FxHashSet<RunId>>,
    released: FxHashMap<Label, FxHashSet<RunId>>,
}

impl<'a> TransitionTxn<'a> {
    /// Open a transaction over the given stores
    ///
    /// The caller is expected to hold the engine's transaction gate for the
    /// life of the transaction.
    pub fn new(runs: &'a RunTable, history: &'a HistoryStore, slots: &'a SlotTable) -> Self {
        TransitionTxn {
            runs,
            history,
            slots,
            staged_runs: FxHashMap::default(),
            staged_history: Vec::new(),
            reserved: FxHashMap::default(),
            released: FxHashMap::default(),
        }
    }

    // ===== Reads =====

    /// Current image of a run, staged writes first
    pub fn run(&self, run_id: &RunId) -> Option<RunRecord> {
        if let Some(staged) = self.staged_runs.get(run_id) {
            return Some(staged.clone());
        }
        self.runs.get(run_id)
    }

    /// Configured capacity for a label, `None` when unlimited
    ///
    /// Limits cannot change while a transaction holds the gate, so this
    /// reads straight through to storage.
    pub fn capacity(&self, label: &str) -> Option<usize> {
        self.slots.capacity(label)
    }

    /// Effective occupants of a label's slots
    ///
    /// Committed occupants, plus runs reserved in this transaction, minus
    /// runs released in this transaction.
    pub fn occupants(&self, label: &str) -> FxHashSet<RunId> {
        let mut occupants = self.slots.occupants(label);
        if let Some(reserved) = self.reserved.get(label) {
            occupants.extend(reserved.iter().copied());
        }
        if let Some(released) = self.released.get(label) {
            for run_id in released {
                occupants.remove(run_id);
            }
        }
        occupants
    }

    /// Effective number of occupied slots for a label
    pub fn occupant_count(&self, label: &str) -> usize {
        self.occupants(label).len()
    }

    /// Whether a run effectively holds a slot for a label
    pub fn is_occupant(&self, label: &str, run_id: &RunId) -> bool {
        self.occupants(label).contains(run_id)
    }

    // ===== Staging =====

    /// Stage a replacement image for a run
    ///
    /// Replaces any image staged earlier in this transaction. Also the path
    /// freshly created records take before their first commit.
    pub fn stage_run(&mut self, record: RunRecord) {
        self.staged_runs.insert(record.id, record);
    }

    /// Stage a history entry, appended at commit in staging order
    pub fn stage_history(&mut self, entry: RunStateHistoryEntry) {
        self.staged_history.push(entry);
    }

    /// Stage the transition of `current` to `payload`
    ///
    /// Builds the post-transition image (version bumped by one) and its
    /// history entry, stages both, and returns the image for inspection.
    pub fn stage_transition(
        &mut self,
        current: &RunRecord,
        payload: &StatePayload,
    ) -> Result<RunRecord> {
        let next = current.apply_transition(payload)?;
        self.stage_history(RunStateHistoryEntry::record(
            next.id,
            next.tenant,
            next.version,
            payload,
        ));
        self.staged_runs.insert(next.id, next.clone());
        Ok(next)
    }

    /// Stage a slot reservation for `run_id` under `label`
    ///
    /// No-op for labels with no configured limit; an unlimited label never
    /// constrains admission, so there is nothing to track. Re-reserving a
    /// slot released earlier in the same transaction cancels the release.
    pub fn stage_reserve(&mut self, label: &str, run_id: RunId) {
        if !self.slots.is_limited(label) {
            return;
        }
        if let Some(released) = self.released.get_mut(label) {
            released.remove(&run_id);
        }
        self.reserved.entry(label.to_string()).or_default().insert(run_id);
    }

    /// Stage a slot release for `run_id` under `label`
    ///
    /// Idempotent, and a no-op for unlimited labels. Releasing a slot
    /// reserved earlier in the same transaction cancels the reservation.
    pub fn stage_release(&mut self, label: &str, run_id: RunId) {
        if !self.slots.is_limited(label) {
            return;
        }
        if let Some(reserved) = self.reserved.get_mut(label) {
            reserved.remove(&run_id);
        }
        self.released.entry(label.to_string()).or_default().insert(run_id);
    }

    // ===== Outcome =====

    /// Number of runs with a staged image
    pub fn staged_run_count(&self) -> usize {
        self.staged_runs.len()
    }

    /// Number of staged history entries
    pub fn staged_history_count(&self) -> usize {
        self.staged_history.len()
    }

    /// Apply every staged mutation to storage
    ///
    /// Applies run images, then history entries, then slot releases, then
    /// slot reservations. The caller holds the transaction gate, so no other
    /// batch observes a point between these steps.
    pub fn commit(self) {
        for (_, record) in self.staged_runs {
            self.runs.put(record);
        }
        for entry in self.staged_history {
            self.history.append(entry);
        }
        for (label, run_ids) in &self.released {
            for run_id in run_ids {
                self.slots.remove_occupant(label, run_id);
            }
        }
        for (label, run_ids) in &self.reserved {
            for run_id in run_ids {
                self.slots.insert_occupant(label, *run_id);
            }
        }
    }

    /// Discard every staged mutation
    pub fn abort(self) {
        tracing::debug!(
            runs = self.staged_runs.len(),
            entries = self.staged_history.len(),
            "discarding staged transaction"
        );
    }
}
