//! Run record table
//!
//! DashMap keyed by run id, one [`RunRecord`] per run. Reads are lock-free
//! and clone the record out; writes happen through `put`, which the engine
//! only calls while holding its exclusive commit section (plus the run
//! catalog at creation time). `put` is a plain upsert: version discipline is
//! the transaction layer's job, not the table's.

use dashmap::DashMap;
use gantry_core::run::RunRecord;
use gantry_core::state::StateTag;
use gantry_core::types::RunId;

/// One record per flow run or task run, sharded by run id
///
/// # Thread Safety
///
/// All operations are thread-safe:
/// - `get()`: lock-free read via DashMap
/// - `put()`: only locks the target shard
/// - Different runs never contend
pub struct RunTable {
    records: DashMap<RunId, RunRecord>,
}

impl RunTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    /// Get a record by run id
    ///
    /// Clones the record out so no shard guard escapes.
    #[inline]
    pub fn get(&self, run_id: &RunId) -> Option<RunRecord> {
        self.records.get(run_id).map(|r| r.clone())
    }

    /// Insert or overwrite a record
    ///
    /// The engine calls this from the catalog (initial insert) and from
    /// transaction commit (staged images). It is also the hook for
    /// out-of-band writes in tests; the table itself enforces nothing.
    #[inline]
    pub fn put(&self, record: RunRecord) {
        self.records.insert(record.id, record);
    }

    /// Check if a run exists
    #[inline]
    pub fn contains(&self, run_id: &RunId) -> bool {
        self.records.contains_key(run_id)
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// List all records, ordered by creation time then id
    ///
    /// Requires collect + sort; list operations are not on the hot path.
    pub fn list(&self) -> Vec<RunRecord> {
        let mut results: Vec<RunRecord> =
            self.records.iter().map(|r| r.value().clone()).collect();
        results.sort_by(|a, b| {
            a.created
                .cmp(&b.created)
                .then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
        });
        results
    }

    /// List records currently in `state`, ordered as [`RunTable::list`]
    pub fn list_by_state(&self, state: StateTag) -> Vec<RunRecord> {
        let mut results: Vec<RunRecord> = self
            .records
            .iter()
            .filter(|r| r.value().state == state)
            .map(|r| r.value().clone())
            .collect();
        results.sort_by(|a, b| {
            a.created
                .cmp(&b.created)
                .then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
        });
        results
    }

    /// Count records currently in `state`
    pub fn count_by_state(&self, state: StateTag) -> usize {
        self.records.iter().filter(|r| r.value().state == state).count()
    }
}

impl Default for RunTable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RunTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunTable")
            .field("len", &self.len())
            .finish()
    }
}
