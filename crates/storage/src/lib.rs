//! Storage layer for the gantry run-state engine
//!
//! This crate implements the in-process substrate the engine mutates:
//! - [`RunTable`]: one record per run, sharded by run id
//! - [`HistoryStore`]: append-only state history per run
//! - [`SlotTable`]: per-label slot counters with occupant sets
//! - [`FlowGroupTable`]: per-group settings
//!
//! The stores themselves are plain concurrent maps; transactional discipline
//! (staging, exclusive commit, compare-and-swap) lives one layer up, and the
//! engine only mutates these tables from inside that exclusive section.
//! Reads are lock-free and clone out.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod groups;
pub mod history;
pub mod records;
pub mod slots;

pub use groups::FlowGroupTable;
pub use history::HistoryStore;
pub use records::RunTable;
pub use slots::{SlotCounter, SlotTable};
