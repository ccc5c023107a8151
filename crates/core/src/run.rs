//! Run records, state history, and catalog configuration
//!
//! A [`RunRecord`] is the single mutable row per flow run or task run. Every
//! applied transition bumps `version` by exactly one and rewrites `state`
//! and `serialized_state` together; a [`RunStateHistoryEntry`] is appended
//! for each applied transition (including the initial state at creation) and
//! is never mutated afterwards.

use crate::error::{EngineError, Result};
use crate::state::{ResultRef, StatePayload, StateTag};
use crate::types::{FlowGroupId, Label, RunId, RunKind, TenantId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Version a freshly created run record starts at
pub const INITIAL_VERSION: u64 = 1;

/// One row per flow run or task run
///
/// Invariants:
/// - `version` strictly increases by exactly 1 per applied transition and
///   never regresses
/// - `state` always matches the tag embedded in `serialized_state`
/// - `parent` is `Some` exactly when `kind` is [`RunKind::Task`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Run identifier
    pub id: RunId,
    /// Owning tenant
    pub tenant: TenantId,
    /// Flow group the run resolves settings through
    pub flow_group: FlowGroupId,
    /// Flow run or task run
    pub kind: RunKind,
    /// Parent flow run (task runs only)
    pub parent: Option<RunId>,
    /// Labels grouping this run under concurrency limits
    pub labels: Vec<Label>,
    /// Monotonic version guarding optimistic concurrency
    pub version: u64,
    /// Current state tag
    pub state: StateTag,
    /// Canonical JSON snapshot of the full current state payload
    pub serialized_state: String,
    /// When the record was created
    pub created: DateTime<Utc>,
    /// When the record last transitioned
    pub updated: DateTime<Utc>,
}

impl RunRecord {
    /// Build a fresh record at [`INITIAL_VERSION`] from an initial payload
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        id: RunId,
        tenant: TenantId,
        flow_group: FlowGroupId,
        kind: RunKind,
        parent: Option<RunId>,
        labels: Vec<Label>,
        initial: &StatePayload,
    ) -> Result<Self> {
        Ok(RunRecord {
            id,
            tenant,
            flow_group,
            kind,
            parent,
            labels,
            version: INITIAL_VERSION,
            state: initial.tag,
            serialized_state: initial.to_snapshot()?,
            created: initial.timestamp,
            updated: initial.timestamp,
        })
    }

    /// Produce the record image after applying `payload`
    ///
    /// Bumps `version` by one and rewrites `state`, `serialized_state`, and
    /// `updated` together. The caller stages the returned image; nothing is
    /// stored here.
    pub fn apply_transition(&self, payload: &StatePayload) -> Result<Self> {
        let mut next = self.clone();
        next.version = self.version + 1;
        next.state = payload.tag;
        next.serialized_state = payload.to_snapshot()?;
        next.updated = payload.timestamp;
        Ok(next)
    }

    /// Decode the stored state snapshot
    ///
    /// Fails with an invalid-state-shape error if the snapshot no longer
    /// parses (possible only through out-of-band writes to the store).
    pub fn decode_state(&self) -> Result<StatePayload> {
        StatePayload::from_snapshot(&self.serialized_state).map_err(|e| {
            EngineError::InvalidStateShape {
                kind: self.kind,
                run_id: self.id,
                reason: format!("stored snapshot does not decode: {e}"),
            }
        })
    }
}

/// Immutable audit entry appended on every applied transition
///
/// History is append-only: entries are never mutated or deleted. The latest
/// entry for a run always agrees with the owning record's `(version, state)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStateHistoryEntry {
    /// Run the entry belongs to
    pub run_id: RunId,
    /// Owning tenant, copied from the record
    pub tenant: TenantId,
    /// Version the run reached with this transition
    pub version: u64,
    /// State tag the run entered
    pub state: StateTag,
    /// Message attached to the transition
    pub message: Option<String>,
    /// When the state was produced
    pub timestamp: DateTime<Utc>,
    /// Opaque result reference carried by the payload
    pub result: Option<ResultRef>,
}

impl RunStateHistoryEntry {
    /// Build the entry recording that `run_id` reached `version` with `payload`
    pub fn record(run_id: RunId, tenant: TenantId, version: u64, payload: &StatePayload) -> Self {
        RunStateHistoryEntry {
            run_id,
            tenant,
            version,
            state: payload.tag,
            message: payload.message.clone(),
            timestamp: payload.timestamp,
            result: payload.result.clone(),
        }
    }
}

/// Per flow-group configuration read by the engine at transition time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FlowGroupSettings {
    /// When true, a supplied expected version must match the stored version
    pub version_locking_enabled: bool,
}

/// A label plus its admission capacity
///
/// Public view of a slot counter: runs currently `Submitted` or `Running`
/// with `label` occupy its slots. A label with no configured limit never
/// constrains admission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcurrencyLimit {
    /// Label the limit applies to
    pub label: Label,
    /// Number of admission slots
    pub capacity: usize,
}
