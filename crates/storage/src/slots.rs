//! Per-label slot counters
//!
//! Each configured label owns one [`SlotCounter`]: its capacity plus the set
//! of runs currently occupying a slot (runs the engine has admitted into
//! `Submitted` or `Running` under that label). Admission policy lives in the
//! engine; this table only stores the counters. Occupant mutations are
//! called exclusively from inside the engine's commit section, so the
//! counter never observes a half-applied reservation.
//!
//! A label with no counter is unconstrained: reservations against it are
//! not tracked and always succeed.

use dashmap::DashMap;
use gantry_core::run::ConcurrencyLimit;
use gantry_core::types::{Label, RunId};
use rustc_hash::FxHashSet;

/// Capacity and current occupants of one label
#[derive(Debug, Clone)]
pub struct SlotCounter {
    pub(crate) capacity: usize,
    pub(crate) occupants: FxHashSet<RunId>,
}

impl SlotCounter {
    /// Create a counter with no occupants
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            occupants: FxHashSet::default(),
        }
    }

    /// Number of admission slots
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of runs currently occupying a slot
    pub fn occupant_count(&self) -> usize {
        self.occupants.len()
    }

    /// Check if a run occupies a slot
    pub fn is_occupant(&self, run_id: &RunId) -> bool {
        self.occupants.contains(run_id)
    }
}

/// Table of slot counters, one per limited label
pub struct SlotTable {
    counters: DashMap<Label, SlotCounter>,
}

impl SlotTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            counters: DashMap::new(),
        }
    }

    /// Create or resize the counter for `label`
    ///
    /// Occupants are preserved on resize; shrinking below the current
    /// occupancy does not evict anyone, it just blocks new admissions until
    /// occupants drain.
    pub fn set_limit(&self, label: impl Into<Label>, capacity: usize) {
        self.counters
            .entry(label.into())
            .and_modify(|counter| counter.capacity = capacity)
            .or_insert_with(|| SlotCounter::new(capacity));
    }

    /// Drop the counter for `label`, lifting the constraint
    ///
    /// Returns true if a counter existed.
    pub fn remove_limit(&self, label: &str) -> bool {
        self.counters.remove(label).is_some()
    }

    /// Read one limit, if configured
    pub fn get_limit(&self, label: &str) -> Option<ConcurrencyLimit> {
        self.counters.get(label).map(|counter| ConcurrencyLimit {
            label: label.to_string(),
            capacity: counter.capacity,
        })
    }

    /// All configured limits, sorted by label
    pub fn list_limits(&self) -> Vec<ConcurrencyLimit> {
        let mut limits: Vec<ConcurrencyLimit> = self
            .counters
            .iter()
            .map(|entry| ConcurrencyLimit {
                label: entry.key().clone(),
                capacity: entry.value().capacity,
            })
            .collect();
        limits.sort_by(|a, b| a.label.cmp(&b.label));
        limits
    }

    /// Capacity of `label`, `None` when unconstrained
    pub fn capacity(&self, label: &str) -> Option<usize> {
        self.counters.get(label).map(|counter| counter.capacity)
    }

    /// Check whether `label` has a counter at all
    pub fn is_limited(&self, label: &str) -> bool {
        self.counters.contains_key(label)
    }

    /// Current occupant set of `label` (empty when unconstrained)
    ///
    /// Clones the set out; the transaction layer overlays its staged
    /// reservations and releases on top of this base.
    pub fn occupants(&self, label: &str) -> FxHashSet<RunId> {
        self.counters
            .get(label)
            .map(|counter| counter.occupants.clone())
            .unwrap_or_default()
    }

    /// Number of runs occupying `label`
    pub fn occupant_count(&self, label: &str) -> usize {
        self.counters
            .get(label)
            .map(|counter| counter.occupants.len())
            .unwrap_or(0)
    }

    /// Check if a run occupies a slot for `label`
    pub fn is_occupant(&self, label: &str, run_id: &RunId) -> bool {
        self.counters
            .get(label)
            .map(|counter| counter.occupants.contains(run_id))
            .unwrap_or(false)
    }

    /// Record that `run_id` occupies a slot for `label`
    ///
    /// Idempotent; a no-op for unconstrained labels. Called only from commit.
    pub fn insert_occupant(&self, label: &str, run_id: RunId) {
        if let Some(mut counter) = self.counters.get_mut(label) {
            counter.occupants.insert(run_id);
        }
    }

    /// Record that `run_id` no longer occupies a slot for `label`
    ///
    /// Idempotent; releasing a never-held or already-released slot is a
    /// no-op. Called only from commit.
    pub fn remove_occupant(&self, label: &str, run_id: &RunId) {
        if let Some(mut counter) = self.counters.get_mut(label) {
            counter.occupants.remove(run_id);
        }
    }
}

impl Default for SlotTable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SlotTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotTable")
            .field("labels", &self.counters.len())
            .finish()
    }
}
