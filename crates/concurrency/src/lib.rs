//! Transaction layer for gantry
//!
//! This crate serializes run-state transitions with:
//! - TxnGate: engine-wide commit gate plus commit/abort counters
//! - TransitionTxn: staged run images, history entries, and slot deltas,
//!   with read-your-own-writes inside a batch
//!
//! A batch of transitions is decided and applied entirely inside the gate,
//! so admission decisions always see the storage state left behind by the
//! previous batch.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod gate;
pub mod txn;

pub use gate::TxnGate;
pub use txn::TransitionTxn;
