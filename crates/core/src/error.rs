//! Unified error type for the run-state engine
//!
//! One error family serves every layer; the facade re-exports it unchanged.
//! Slot denial is deliberately absent: losing an admission race is a normal
//! outcome (`NOOP` / `QUEUED`), never an error.

use crate::types::{RunId, RunKind};
use thiserror::Error;

/// All engine errors.
///
/// Batch-aborting variants render with the caller-facing message
/// conventions: `"State payload is too large"` for the pre-transaction size
/// cap, and `"State update failed for <kind> run ID <run_id>"` for per-run
/// rejections.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A state payload (or the batch total) exceeded the size cap
    #[error("State payload is too large")]
    PayloadTooLarge {
        /// Serialized bytes observed
        actual: usize,
        /// Configured cap in bytes
        limit: usize,
    },

    /// Version locking is enabled and the supplied expected version does not
    /// match the stored version
    #[error("State update failed for {kind} run ID {run_id}: expected version {expected}, stored version is {stored}")]
    VersionConflict {
        /// Kind of the run the item addressed
        kind: RunKind,
        /// Run the item addressed
        run_id: RunId,
        /// Version the caller supplied
        expected: u64,
        /// Version actually stored
        stored: u64,
    },

    /// A task run item carried a parent-flow-run version expectation that
    /// does not match the parent's stored version
    #[error("State update failed for task run ID {run_id}: parent flow run is at version {stored}, expected {expected}")]
    ParentVersionMismatch {
        /// Task run the item addressed
        run_id: RunId,
        /// Parent version the caller expected
        expected: u64,
        /// Parent version actually stored
        stored: u64,
    },

    /// The request or a stored snapshot is structurally invalid
    #[error("State update failed for {kind} run ID {run_id}: {reason}")]
    InvalidStateShape {
        /// Kind of the run the item addressed
        kind: RunKind,
        /// Run the item addressed
        run_id: RunId,
        /// What was malformed
        reason: String,
    },

    /// No record exists for the identifier
    #[error("run not found: {0}")]
    RunNotFound(RunId),

    /// Payload snapshot could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Bug or invariant violation
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

impl EngineError {
    /// Check if this is a version conflict (own version or parent version).
    ///
    /// Conflicts may succeed on retry with a fresh expected version.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            EngineError::VersionConflict { .. } | EngineError::ParentVersionMismatch { .. }
        )
    }

    /// Check if this is the pre-transaction payload size rejection.
    pub fn is_payload_too_large(&self) -> bool {
        matches!(self, EngineError::PayloadTooLarge { .. })
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, EngineError::RunNotFound(_))
    }
}

// Convert from serde_json errors
impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::Serialization(e.to_string())
    }
}
