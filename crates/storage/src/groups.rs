//! Flow-group settings table
//!
//! Settings are read by the engine at transition time and written through
//! the settings catalog. Groups are implicit: reading an unconfigured group
//! yields defaults, so creating a run never requires registering its group
//! first.

use dashmap::DashMap;
use gantry_core::run::FlowGroupSettings;
use gantry_core::types::FlowGroupId;

/// Per flow-group settings
pub struct FlowGroupTable {
    settings: DashMap<FlowGroupId, FlowGroupSettings>,
}

impl FlowGroupTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            settings: DashMap::new(),
        }
    }

    /// Read settings for a group, defaults when unset
    pub fn get(&self, group: &FlowGroupId) -> FlowGroupSettings {
        self.settings
            .get(group)
            .map(|s| *s)
            .unwrap_or_default()
    }

    /// Replace settings for a group
    pub fn set(&self, group: FlowGroupId, settings: FlowGroupSettings) {
        self.settings.insert(group, settings);
    }

    /// Toggle version locking for a group, keeping other settings
    pub fn set_version_locking(&self, group: FlowGroupId, enabled: bool) {
        let mut entry = self.settings.entry(group).or_default();
        entry.version_locking_enabled = enabled;
    }
}

impl Default for FlowGroupTable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FlowGroupTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowGroupTable")
            .field("groups", &self.settings.len())
            .finish()
    }
}
