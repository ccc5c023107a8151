//! Batch state transitions and cancellation.

use crate::error::{Error, Result};
use crate::types::{RunId, StatePayload, StateUpdate, TransitionRequest};
use gantry_engine::Engine;
use std::sync::Arc;

/// Batch transition and cancellation operations.
///
/// Access via `db.states`.
pub struct States {
    engine: Arc<Engine>,
}

impl States {
    pub(crate) fn new(engine: Arc<Engine>) -> Self {
        Self { engine }
    }

    /// Apply an ordered batch of transition requests atomically.
    ///
    /// On full success, returns one status per item in request order. Any
    /// rejected item aborts the whole batch: no run is mutated and the
    /// first error is returned, even for items earlier in the batch that
    /// had individually validated.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let updates = db.states.set(&[
    ///     TransitionRequest::new(flow.id, StatePayload::new(StateTag::Running)),
    ///     TransitionRequest::new(task.id, StatePayload::new(StateTag::Running))
    ///         .with_parent_version_check(3),
    /// ])?;
    /// ```
    pub fn set(&self, requests: &[TransitionRequest]) -> Result<Vec<StateUpdate>> {
        self.engine.set_states(requests)
    }

    /// Apply a single transition request.
    ///
    /// Convenience for one-item batches; same semantics as [`States::set`].
    pub fn set_one(&self, request: TransitionRequest) -> Result<StateUpdate> {
        let mut updates = self.engine.set_states(std::slice::from_ref(&request))?;
        updates
            .pop()
            .ok_or_else(|| Error::Internal("empty response for a one-item batch".to_string()))
    }

    /// Request cancellation of a run.
    ///
    /// Idempotent, and always returns the resulting state for a known run:
    /// `Cancelling` for runs that were executing, `Cancelled` for runs that
    /// never started, the unchanged terminal state for finished runs.
    pub fn cancel(&self, run_id: RunId) -> Result<StatePayload> {
        self.engine.cancel_run(run_id)
    }
}
