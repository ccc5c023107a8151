//! Slot admission policy
//!
//! Reservation is evaluated against the transaction's effective slot view,
//! so a batch sees its own earlier reservations and releases. Checking and
//! staging happen while the caller holds the transaction gate, which is
//! what makes admission exact: with capacity `k` and any number of racing
//! attempts, exactly `k` runs ever hold a label's slots at once.

use gantry_concurrency::TransitionTxn;
use gantry_core::run::RunRecord;
use gantry_core::types::Label;

/// Outcome of a reservation attempt
pub(crate) enum Admission {
    /// Every label had a free slot (or the run already held one)
    Granted,
    /// At least one label was full; nothing was staged
    Denied {
        /// First label without a free slot
        label: Label,
    },
}

/// Try to reserve a slot for every label on `record`
///
/// All labels are checked before any slot is staged: multi-label admission
/// is all or nothing. A label the run already occupies passes through
/// without consuming a second slot, and unlimited labels never constrain.
pub(crate) fn try_reserve(txn: &mut TransitionTxn<'_>, record: &RunRecord) -> Admission {
    for label in &record.labels {
        let Some(capacity) = txn.capacity(label) else {
            continue;
        };
        if txn.is_occupant(label, &record.id) {
            continue;
        }
        if txn.occupant_count(label) >= capacity {
            return Admission::Denied {
                label: label.clone(),
            };
        }
    }
    for label in &record.labels {
        txn.stage_reserve(label, record.id);
    }
    Admission::Granted
}

/// Release whatever slots `record` holds
///
/// Idempotent per label; releasing a slot the run does not hold is a no-op.
pub(crate) fn release_slots(txn: &mut TransitionTxn<'_>, record: &RunRecord) {
    for label in &record.labels {
        txn.stage_release(label, record.id);
    }
}
