//! Flow group settings.

use crate::types::{FlowGroupId, FlowGroupSettings};
use gantry_engine::Engine;
use std::sync::Arc;

/// Flow group settings operations.
///
/// Access via `db.groups`. Settings default to version locking off for
/// groups that were never configured.
pub struct Groups {
    engine: Arc<Engine>,
}

impl Groups {
    pub(crate) fn new(engine: Arc<Engine>) -> Self {
        Self { engine }
    }

    /// Settings for a flow group.
    pub fn settings(&self, group: &FlowGroupId) -> FlowGroupSettings {
        self.engine.group_settings(group)
    }

    /// Turn optimistic version locking on or off for a flow group.
    ///
    /// With locking off (the default), supplied expected versions are
    /// accepted without comparison and writers race last-writer-wins.
    pub fn set_version_locking(&self, group: FlowGroupId, enabled: bool) {
        self.engine.set_version_locking(group, enabled)
    }
}
