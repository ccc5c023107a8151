//! Error types for the gantry unified API.
//!
//! One error family serves the whole stack; this module re-exports it
//! under the facade's names. Batch-aborting variants carry the
//! caller-facing message conventions (`"State payload is too large"`,
//! `"State update failed for <kind> run ID <run_id>"`); losing an
//! admission race is reported through item statuses, never through an
//! error.

pub use gantry_core::error::{EngineError as Error, Result};
