//! # Gantry
//!
//! Embedded run-state orchestration engine for workflow backends.
//!
//! Gantry tracks the lifecycle of flow runs and their task runs through a
//! finite state catalog, under concurrent writers. Batches of transition
//! requests are applied atomically: each item is accepted, coerced into
//! `Queued`, left alone, or rejected together with the whole batch, while
//! the engine enforces optimistic version locking, parent/child version
//! expectations, and exact-capacity concurrency slots.
//!
//! ## Quick Start
//!
//! ```ignore
//! use gantry::prelude::*;
//!
//! let db = Gantry::new();
//!
//! // Two runs may hold a "db" slot at once
//! db.limits.set("db", 2);
//!
//! // Create a flow run and move it along
//! let flow = db.runs.create_flow(tenant, group, vec!["db".into()])?;
//! let updates = db.states.set(&[
//!     TransitionRequest::new(flow.id, StatePayload::new(StateTag::Submitted)),
//! ])?;
//! assert_eq!(updates[0].status, SetStateStatus::Success);
//!
//! // Cancellation always reports the resulting state
//! let state = db.states.cancel(flow.id)?;
//! ```
//!
//! ## Surfaces
//!
//! - [`Runs`] - run catalog: creation, lookup, history
//! - [`States`] - batch transitions and cancellation
//! - [`Limits`] - per-label concurrency limits
//! - [`Groups`] - per flow-group settings such as version locking

#![warn(missing_docs)]

mod api;
mod error;
mod orchestrator;
mod types;

pub mod prelude;

// Re-export main entry points
pub use orchestrator::{Gantry, GantryBuilder};
pub use error::{Error, Result};

// Re-export API surfaces
pub use api::{Groups, Limits, Runs, States};

// Re-export types
pub use types::*;
