//! Concurrency limit configuration.

use crate::types::{ConcurrencyLimit, Label};
use gantry_engine::Engine;
use std::sync::Arc;

/// Concurrency limit operations.
///
/// Access via `db.limits`. A label with no configured limit never
/// constrains admission; capacity 0 admits nothing.
pub struct Limits {
    engine: Arc<Engine>,
}

impl Limits {
    pub(crate) fn new(engine: Arc<Engine>) -> Self {
        Self { engine }
    }

    /// Create or resize the limit for a label.
    ///
    /// Resizing keeps current occupants; shrinking below the occupied
    /// count leaves the label over-subscribed until runs drain out.
    ///
    /// # Example
    ///
    /// ```ignore
    /// db.limits.set("db", 2);
    /// ```
    pub fn set(&self, label: impl Into<Label>, capacity: usize) {
        self.engine.set_concurrency_limit(label, capacity)
    }

    /// Drop the limit for a label, returning whether one existed.
    pub fn remove(&self, label: &str) -> bool {
        self.engine.remove_concurrency_limit(label)
    }

    /// Configured limit for a label, if any.
    pub fn get(&self, label: &str) -> Option<ConcurrencyLimit> {
        self.engine.concurrency_limit(label)
    }

    /// All configured limits, sorted by label.
    pub fn list(&self) -> Vec<ConcurrencyLimit> {
        self.engine.list_concurrency_limits()
    }

    /// Number of slots currently occupied for a label.
    pub fn occupancy(&self, label: &str) -> usize {
        self.engine.occupied_slots(label)
    }
}
