//! Engine-wide transaction gate
//!
//! Every state-changing operation runs inside the gate: acquire the lock,
//! build a [`TransitionTxn`], decide the batch against the staged view, then
//! commit or abort. Reads outside the gate are lock-free.

use crate::txn::TransitionTxn;
use parking_lot::{Mutex, MutexGuard};
use std::sync::atomic::{AtomicU64, Ordering};

/// Serializes transition batches and counts their outcomes
///
/// The gate prevents the decide/apply race between concurrent batches.
/// Without it the following interleaving can over-admit a limited label:
/// 1. Batch A counts slot occupants for label L (one slot free)
/// 2. Batch B counts slot occupants for label L (same free slot)
/// 3. Batch A applies, filling the slot
/// 4. Batch B applies its stale decision, exceeding the capacity
///
/// Holding the lock from first read to last write makes decide plus apply
/// atomic with respect to every other batch, which is what gives a limited
/// label its exact-capacity admission behavior.
///
/// # Thread Safety
///
/// The lock only covers state-changing batches. Catalog reads go straight
/// to storage and may observe a batch's writes record by record, but never
/// a partially applied record (each record is replaced as one image).
pub struct TxnGate {
    /// Commit serialization lock
    lock: Mutex<()>,

    /// Batches committed since startup
    committed: AtomicU64,

    /// Batches aborted since startup
    ///
    /// Aborts cover both rejected batches (version conflict, parent
    /// mismatch, unknown run) and internal errors. An aborted batch leaves
    /// no trace in storage.
    aborted: AtomicU64,
}

impl TxnGate {
    /// Create a gate with zeroed counters
    pub fn new() -> Self {
        TxnGate {
            lock: Mutex::new(()),
            committed: AtomicU64::new(0),
            aborted: AtomicU64::new(0),
        }
    }

    /// Acquire the gate
    ///
    /// Blocks until every earlier batch has committed or aborted. The caller
    /// holds the returned guard across decide and apply.
    pub fn lock(&self) -> MutexGuard<'_, ()> {
        self.lock.lock()
    }

    /// Apply a staged transaction and count the commit
    ///
    /// The caller must still hold the guard returned by [`TxnGate::lock`].
    pub fn commit(&self, txn: TransitionTxn<'_>) {
        let runs = txn.staged_run_count();
        let entries = txn.staged_history_count();
        txn.commit();
        self.committed.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(runs, entries, "transaction committed");
    }

    /// Discard a staged transaction and count the abort
    pub fn abort(&self, txn: TransitionTxn<'_>) {
        let runs = txn.staged_run_count();
        txn.abort();
        self.aborted.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(runs, "transaction aborted");
    }

    /// Number of batches committed since startup
    pub fn committed(&self) -> u64 {
        self.committed.load(Ordering::SeqCst)
    }

    /// Number of batches aborted since startup
    pub fn aborted(&self) -> u64 {
        self.aborted.load(Ordering::SeqCst)
    }
}

impl Default for TxnGate {
    fn default() -> Self {
        Self::new()
    }
}
