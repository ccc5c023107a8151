//! Transition rules
//!
//! [`decide`] computes the effective outcome of one requested transition
//! against the transaction's staged view, after the caller has already
//! cleared the version gates. Rules, in evaluation order:
//!
//! 1. A terminal run accepts only an identical re-assertion of its terminal
//!    tag; any other target leaves it unchanged.
//! 2. A target of `Submitted` needs a slot for every label; denial leaves
//!    the run as it is, without an error.
//! 3. A target of `Running` needs a slot the same way (a run coming from
//!    `Submitted` passes through on the slot it already holds); denial
//!    queues the run instead of running it.
//! 4. Every other target proceeds as requested.
//!
//! Losing the admission race is never an error: a caller bursting
//! submissions sees `NOOP`/`QUEUED` items for the runs that lost, not
//! failures.

use crate::admission::{self, Admission};
use gantry_concurrency::TransitionTxn;
use gantry_core::run::RunRecord;
use gantry_core::state::{StatePayload, StateTag};

/// Effective outcome of one transition request
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Decision {
    /// Apply the requested payload
    Accept,
    /// Apply a `Queued` payload instead of the requested `Running` one
    CoerceQueued {
        /// Why admission was denied; stored on the queued payload
        reason: String,
    },
    /// Identical re-assertion of a terminal state; report success, write
    /// nothing
    Reassert,
    /// Leave the run unchanged and tell the caller why
    Ignore {
        /// Why nothing happened
        reason: String,
    },
}

/// Decide the outcome of moving `record` to `target`
///
/// May stage slot reservations on `txn` when the decision admits the run;
/// a denied attempt stages nothing.
pub(crate) fn decide(
    txn: &mut TransitionTxn<'_>,
    record: &RunRecord,
    target: &StatePayload,
) -> Decision {
    if record.state.is_terminal() {
        if target.tag == record.state {
            return Decision::Reassert;
        }
        return Decision::Ignore {
            reason: format!("run already finished as {}", record.state),
        };
    }

    match target.tag {
        StateTag::Submitted => match admission::try_reserve(txn, record) {
            Admission::Granted => Decision::Accept,
            Admission::Denied { label } => Decision::Ignore {
                reason: format!("no free concurrency slot for label {label:?}"),
            },
        },
        StateTag::Running => match admission::try_reserve(txn, record) {
            Admission::Granted => Decision::Accept,
            Admission::Denied { label } => Decision::CoerceQueued {
                reason: format!("no free concurrency slot for label {label:?}"),
            },
        },
        StateTag::Scheduled
        | StateTag::Pending
        | StateTag::Queued
        | StateTag::Cancelling
        | StateTag::Cancelled
        | StateTag::Success
        | StateTag::Failed
        | StateTag::Retrying => Decision::Accept,
    }
}

/// What a cancellation request does to a run in a given state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CancelAction {
    /// Transition to the given tag (`Cancelling` or `Cancelled`)
    Transition(StateTag),
    /// Report the current state unchanged, with no version bump
    Unchanged,
}

/// Translate a cancellation request per the run's current state
///
/// Runs that are executing wind down through `Cancelling`; runs that never
/// started go straight to `Cancelled`. Terminal runs and runs already
/// cancelling are reported as they are, making cancellation idempotent.
pub(crate) fn decide_cancel(record: &RunRecord) -> CancelAction {
    match record.state {
        StateTag::Running => CancelAction::Transition(StateTag::Cancelling),
        StateTag::Scheduled
        | StateTag::Pending
        | StateTag::Submitted
        | StateTag::Queued
        | StateTag::Retrying => CancelAction::Transition(StateTag::Cancelled),
        StateTag::Cancelling | StateTag::Cancelled | StateTag::Success | StateTag::Failed => {
            CancelAction::Unchanged
        }
    }
}
