//! Run-state orchestration engine for gantry
//!
//! The engine accepts ordered batches of transition requests and decides,
//! under one transaction gate, whether each item is applied as requested,
//! coerced into `Queued`, left alone, or rejected together with the whole
//! batch. Along the way it enforces:
//! - per-run optimistic version locking (when the flow group opts in)
//! - parent-flow-run version expectations on task run items
//! - exact-capacity slot admission for labeled runs
//! - a pre-transaction cap on serialized payload size
//!
//! Every mutation a batch produces becomes visible atomically or not at all.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod admission;
mod engine;
mod payload;
mod states;
mod transitions;

pub mod config;

pub use config::EngineConfig;
pub use engine::{Engine, EngineMetrics};
