//! Identifier types for the run-state engine
//!
//! This module defines the fundamental identifiers used throughout the system:
//! - [`RunId`]: unique identifier for flow runs and task runs
//! - [`TenantId`]: owning tenant of a run
//! - [`FlowGroupId`]: flow group a run resolves its settings through
//! - [`RunKind`]: whether a record is a flow run or a task run

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A label attached to a run, grouping it under a concurrency limit.
pub type Label = String;

/// Unique identifier for a run (flow run or task run)
///
/// RunId is used throughout the system to identify individual runs.
/// It appears in:
/// - Run records and state history entries
/// - Transition requests and per-item responses
/// - Slot-counter occupant sets
///
/// # Examples
///
/// ```
/// use gantry_core::types::RunId;
///
/// let id1 = RunId::new();
/// let id2 = RunId::new();
/// assert_ne!(id1, id2); // Each RunId is unique
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(Uuid);

impl RunId {
    /// Create a new random RunId using UUID v4
    pub fn new() -> Self {
        RunId(Uuid::new_v4())
    }

    /// Create a RunId from an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        RunId(uuid)
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Owning tenant of a run
///
/// Every run record and history entry carries the tenant it was created
/// under. The engine stores the tenant verbatim; isolation policy lives
/// with the caller.
///
/// # Examples
///
/// ```
/// use gantry_core::types::TenantId;
///
/// let tenant = TenantId::new();
/// assert_ne!(tenant, TenantId::new());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantId(Uuid);

impl TenantId {
    /// Create a new random TenantId
    pub fn new() -> Self {
        TenantId(Uuid::new_v4())
    }

    /// Create a TenantId from an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        TenantId(uuid)
    }
}

impl Default for TenantId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Flow group a run resolves its settings through
///
/// Flow runs record the group they were created under; task runs inherit
/// the group of their parent flow run. Per-group settings (notably
/// version locking) are read from the settings catalog at transition time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlowGroupId(Uuid);

impl FlowGroupId {
    /// Create a new random FlowGroupId
    pub fn new() -> Self {
        FlowGroupId(Uuid::new_v4())
    }

    /// Create a FlowGroupId from an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        FlowGroupId(uuid)
    }
}

impl Default for FlowGroupId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for FlowGroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a run record is a flow run or a task run
///
/// Task runs carry a back-reference to their parent flow run and may gate
/// their transitions on the parent's version. The kind also appears in
/// failure messages ("State update failed for flow run ID ...").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunKind {
    /// Top-level run of a flow
    Flow,
    /// Child run of a single task within a flow run
    Task,
}

impl RunKind {
    /// Check if this is a task run
    pub fn is_task(&self) -> bool {
        matches!(self, RunKind::Task)
    }

    /// Get string representation as used in failure messages
    pub fn as_str(&self) -> &'static str {
        match self {
            RunKind::Flow => "flow",
            RunKind::Task => "task",
        }
    }
}

impl std::fmt::Display for RunKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
