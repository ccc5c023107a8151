//! Transition request and response envelopes
//!
//! A batch is an ordered list of [`TransitionRequest`] items. On full
//! success the caller gets one [`StateUpdate`] per item, in order; on any
//! rejection the whole batch fails with a single error and no run is
//! mutated.

use crate::state::StatePayload;
use crate::types::RunId;
use serde::{Deserialize, Serialize};

/// One requested state transition
///
/// # Examples
///
/// ```
/// use gantry_core::request::TransitionRequest;
/// use gantry_core::state::{StatePayload, StateTag};
/// use gantry_core::types::RunId;
///
/// let request = TransitionRequest::new(RunId::new(), StatePayload::new(StateTag::Running))
///     .with_expected_version(3);
/// assert_eq!(request.expected_version, Some(3));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionRequest {
    /// Run to transition
    pub run_id: RunId,
    /// Version the caller believes the run is at; compared only when the
    /// run's flow group has version locking enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_version: Option<u64>,
    /// Requested state payload
    pub state: StatePayload,
    /// Expected parent-flow-run version (task runs only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_version_check: Option<u64>,
}

impl TransitionRequest {
    /// Request that `run_id` move to `state`
    pub fn new(run_id: RunId, state: StatePayload) -> Self {
        TransitionRequest {
            run_id,
            expected_version: None,
            state,
            parent_version_check: None,
        }
    }

    /// Gate the item on the run's own version (when locking is enabled)
    pub fn with_expected_version(mut self, version: u64) -> Self {
        self.expected_version = Some(version);
        self
    }

    /// Gate the item on the parent flow run's current version
    pub fn with_parent_version_check(mut self, version: u64) -> Self {
        self.parent_version_check = Some(version);
        self
    }
}

/// Effective status of one batch item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetStateStatus {
    /// The transition was applied as requested (or was an idempotent
    /// re-assertion of the run's terminal state)
    #[serde(rename = "SUCCESS")]
    Success,
    /// Admission was denied and the run was queued instead of running
    #[serde(rename = "QUEUED")]
    Queued,
    /// Nothing happened and nothing failed; the run is unchanged
    #[serde(rename = "NOOP")]
    NoOp,
}

impl SetStateStatus {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            SetStateStatus::Success => "SUCCESS",
            SetStateStatus::Queued => "QUEUED",
            SetStateStatus::NoOp => "NOOP",
        }
    }
}

impl std::fmt::Display for SetStateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-item response for a fully applied batch
///
/// `message` is `None` for `SUCCESS` and `QUEUED` items; `NOOP` items carry
/// a short reason so the caller can tell why nothing happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateUpdate {
    /// Run the item addressed
    pub run_id: RunId,
    /// Effective status of the item
    pub status: SetStateStatus,
    /// Reason, for `NOOP` items
    pub message: Option<String>,
}

impl StateUpdate {
    /// Item applied as requested
    pub fn success(run_id: RunId) -> Self {
        StateUpdate {
            run_id,
            status: SetStateStatus::Success,
            message: None,
        }
    }

    /// Item coerced into `Queued`
    pub fn queued(run_id: RunId) -> Self {
        StateUpdate {
            run_id,
            status: SetStateStatus::Queued,
            message: None,
        }
    }

    /// Item left the run unchanged
    pub fn noop(run_id: RunId, message: impl Into<String>) -> Self {
        StateUpdate {
            run_id,
            status: SetStateStatus::NoOp,
            message: Some(message.into()),
        }
    }
}
