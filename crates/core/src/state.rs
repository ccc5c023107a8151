//! State catalog and transition payloads
//!
//! A run's position in its lifecycle is a [`StateTag`]. Transition requests
//! carry a full [`StatePayload`]: the tag plus the superset of optional
//! fields every state may carry (message, timestamp, result reference,
//! start time). Records persist the payload as a canonical JSON snapshot;
//! the snapshot is also what the payload size cap is measured over.
//!
//! ## State catalog
//!
//! | Tag | Terminal | Holds a slot |
//! |-----|----------|--------------|
//! | Scheduled | no | no |
//! | Pending | no | no |
//! | Submitted | no | yes |
//! | Queued | no | no |
//! | Running | no | yes |
//! | Cancelling | no | no |
//! | Cancelled | yes | no |
//! | Success | yes | no |
//! | Failed | yes | no |
//! | Retrying | no | no |

use crate::error::{EngineError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The category a run is currently in
///
/// Terminal tags (`Success`, `Failed`, `Cancelled`) never transition forward
/// again through the normal path. `Submitted` and `Running` are the two tags
/// that occupy a concurrency slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateTag {
    /// Work is scheduled for a future start
    Scheduled,
    /// Record exists but work has not been picked up
    Pending,
    /// An agent has claimed the run and holds a concurrency slot
    Submitted,
    /// Admission was denied; the run waits for a free slot
    Queued,
    /// Work is executing and holds a concurrency slot
    Running,
    /// A cancellation was requested for a running run
    Cancelling,
    /// Terminal: the run was cancelled before or during execution
    Cancelled,
    /// Terminal: the run finished successfully
    Success,
    /// Terminal: the run finished with an error
    Failed,
    /// The run failed and is waiting to be retried
    Retrying,
}

impl StateTag {
    /// Check if this tag is terminal (`Success`, `Failed`, `Cancelled`)
    pub fn is_terminal(&self) -> bool {
        matches!(self, StateTag::Success | StateTag::Failed | StateTag::Cancelled)
    }

    /// Check if a run in this state occupies a concurrency slot
    pub fn occupies_slot(&self) -> bool {
        matches!(self, StateTag::Submitted | StateTag::Running)
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            StateTag::Scheduled => "Scheduled",
            StateTag::Pending => "Pending",
            StateTag::Submitted => "Submitted",
            StateTag::Queued => "Queued",
            StateTag::Running => "Running",
            StateTag::Cancelling => "Cancelling",
            StateTag::Cancelled => "Cancelled",
            StateTag::Success => "Success",
            StateTag::Failed => "Failed",
            StateTag::Retrying => "Retrying",
        }
    }
}

impl std::fmt::Display for StateTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Opaque reference to a run's result value
///
/// The engine never inspects or resolves result contents; it carries the
/// reference through payloads and history entries verbatim. Size abuse is
/// caught by the payload cap, not by looking inside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRef(serde_json::Value);

impl ResultRef {
    /// Wrap an opaque result document
    pub fn new(value: serde_json::Value) -> Self {
        ResultRef(value)
    }

    /// Borrow the opaque document
    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

/// Full state payload carried by a transition request
///
/// One struct carries the superset of fields any state may use; the tag
/// discriminates. Stored records keep the canonical JSON rendering of this
/// payload (see [`StatePayload::to_snapshot`]) and the record's `state`
/// column always matches `tag`.
///
/// # Examples
///
/// ```
/// use gantry_core::state::{StatePayload, StateTag};
///
/// let payload = StatePayload::new(StateTag::Running)
///     .with_message("worker picked up the run");
/// assert_eq!(payload.tag, StateTag::Running);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatePayload {
    /// State catalog tag
    pub tag: StateTag,
    /// Human-readable note attached to the transition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// When the state was produced
    pub timestamp: DateTime<Utc>,
    /// Opaque reference to the run's result value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ResultRef>,
    /// When execution actually started (meaningful from `Running` onward)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
}

impl StatePayload {
    /// Create a payload for `tag`, stamped with the current time
    pub fn new(tag: StateTag) -> Self {
        StatePayload {
            tag,
            message: None,
            timestamp: Utc::now(),
            result: None,
            start_time: None,
        }
    }

    /// Attach a message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attach an opaque result reference
    pub fn with_result(mut self, result: ResultRef) -> Self {
        self.result = Some(result);
        self
    }

    /// Attach an execution start time
    pub fn with_start_time(mut self, start_time: DateTime<Utc>) -> Self {
        self.start_time = Some(start_time);
        self
    }

    /// Render the canonical JSON snapshot persisted on the run record
    pub fn to_snapshot(&self) -> Result<String> {
        serde_json::to_string(self).map_err(EngineError::from)
    }

    /// Decode a stored snapshot back into a payload
    pub fn from_snapshot(snapshot: &str) -> Result<Self> {
        serde_json::from_str(snapshot).map_err(EngineError::from)
    }

    /// Serialized size in bytes, as measured by the payload cap
    pub fn serialized_size(&self) -> Result<usize> {
        Ok(self.to_snapshot()?.len())
    }
}
