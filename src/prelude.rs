//! Convenient imports for gantry.
//!
//! This module re-exports the most commonly used types so you can get started
//! with a single import:
//!
//! ```ignore
//! use gantry::prelude::*;
//!
//! let db = Gantry::new();
//! db.limits.set("db", 2);
//! ```

// Main entry point
pub use crate::orchestrator::{Gantry, GantryBuilder};

// Error handling
pub use crate::error::{Error, Result};

// API surfaces
pub use crate::api::{Groups, Limits, Runs, States};

// Identifiers
pub use crate::types::{FlowGroupId, RunId, RunKind, TenantId};

// States and transitions
pub use crate::types::{
    ResultRef, SetStateStatus, StatePayload, StateTag, StateUpdate, TransitionRequest,
};

// Catalog types
pub use crate::types::{ConcurrencyLimit, FlowGroupSettings, RunRecord};

// Re-export serde_json for convenience
pub use serde_json::json;
