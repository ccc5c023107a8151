//! Pre-transaction payload size screening
//!
//! Runs before the transaction gate is taken and before any storage read.
//! The cap applies to each item's serialized payload and to the batch
//! total, so one oversized item rejects the whole batch including its
//! otherwise valid neighbors.

use gantry_core::error::{EngineError, Result};
use gantry_core::request::TransitionRequest;

/// Reject the batch if any payload, or the batch total, exceeds `limit` bytes
pub(crate) fn check_requests(requests: &[TransitionRequest], limit: usize) -> Result<()> {
    let mut total: usize = 0;
    for request in requests {
        let size = request.state.serialized_size()?;
        if size > limit {
            return Err(EngineError::PayloadTooLarge {
                actual: size,
                limit,
            });
        }
        total = total.saturating_add(size);
        if total > limit {
            return Err(EngineError::PayloadTooLarge {
                actual: total,
                limit,
            });
        }
    }
    Ok(())
}
