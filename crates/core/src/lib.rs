//! Core types for the gantry run-state engine
//!
//! This crate defines the vocabulary shared by every layer of the engine:
//! - [`types`]: identifiers (runs, tenants, flow groups) and run kinds
//! - [`state`]: the state catalog and the state payload carried by transitions
//! - [`run`]: run records, state history entries, and catalog configuration
//! - [`request`]: transition request and response envelopes
//! - [`error`]: the engine-wide error type

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod request;
pub mod run;
pub mod state;
pub mod types;

pub use error::{EngineError, Result};
pub use request::{SetStateStatus, StateUpdate, TransitionRequest};
pub use run::{
    ConcurrencyLimit, FlowGroupSettings, RunRecord, RunStateHistoryEntry, INITIAL_VERSION,
};
pub use state::{ResultRef, StatePayload, StateTag};
pub use types::{FlowGroupId, Label, RunId, RunKind, TenantId};
