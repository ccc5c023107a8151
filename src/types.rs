//! Public types for the gantry unified API.
//!
//! This module re-exports types from internal crates with a clean public interface.

// Identifiers and run kinds
pub use gantry_core::types::{FlowGroupId, Label, RunId, RunKind, TenantId};

// State catalog and payloads
pub use gantry_core::state::{ResultRef, StatePayload, StateTag};

// Run records, history, and catalog configuration
pub use gantry_core::run::{
    ConcurrencyLimit, FlowGroupSettings, RunRecord, RunStateHistoryEntry, INITIAL_VERSION,
};

// Transition envelopes
pub use gantry_core::request::{SetStateStatus, StateUpdate, TransitionRequest};

// Engine configuration and counters
pub use gantry_engine::{EngineConfig, EngineMetrics};
