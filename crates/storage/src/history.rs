//! Append-only run state history
//!
//! Every applied transition (and the initial state at creation) appends one
//! [`RunStateHistoryEntry`]. Entries are never mutated or deleted; versions
//! within a run's history are strictly increasing because appends only
//! happen inside the engine's exclusive commit section, in version order.

use dashmap::DashMap;
use gantry_core::run::RunStateHistoryEntry;
use gantry_core::types::RunId;

/// Per-run append-only history log
pub struct HistoryStore {
    entries: DashMap<RunId, Vec<RunStateHistoryEntry>>,
}

impl HistoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Append one entry to its run's history
    pub fn append(&self, entry: RunStateHistoryEntry) {
        let mut log = self.entries.entry(entry.run_id).or_default();
        if let Some(last) = log.last() {
            // Appends arrive in commit order; a regression here is a bug in
            // the transaction layer, not recoverable data.
            if entry.version <= last.version {
                tracing::error!(
                    run_id = %entry.run_id,
                    last_version = last.version,
                    new_version = entry.version,
                    "history append out of order"
                );
            }
            debug_assert!(entry.version > last.version);
        }
        log.push(entry);
    }

    /// All entries for a run, in append order
    pub fn entries(&self, run_id: &RunId) -> Vec<RunStateHistoryEntry> {
        self.entries
            .get(run_id)
            .map(|log| log.clone())
            .unwrap_or_default()
    }

    /// Latest entry for a run
    pub fn latest(&self, run_id: &RunId) -> Option<RunStateHistoryEntry> {
        self.entries
            .get(run_id)
            .and_then(|log| log.last().cloned())
    }

    /// Number of entries recorded for a run
    pub fn len(&self, run_id: &RunId) -> usize {
        self.entries.get(run_id).map(|log| log.len()).unwrap_or(0)
    }

    /// Check if a run has no history
    pub fn is_empty(&self, run_id: &RunId) -> bool {
        self.len(run_id) == 0
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HistoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryStore")
            .field("runs", &self.entries.len())
            .finish()
    }
}
