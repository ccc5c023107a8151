//! Engine configuration

/// Default cap on serialized state payload size, in bytes
///
/// Large enough for any ordinary state payload; a result of meaningful size
/// belongs in the result store, with only an opaque reference carried in the
/// payload.
pub const DEFAULT_MAX_STATE_PAYLOAD_BYTES: usize = 2_000_000;

/// Tunable knobs for an [`Engine`](crate::Engine)
///
/// Holds static tunables only. Flow-group settings and concurrency limits
/// are runtime catalog state, mutated through the engine itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Cap on the serialized size of any single state payload and of a
    /// whole batch, in bytes
    pub max_state_payload_bytes: usize,
}

impl EngineConfig {
    /// Configuration with every knob at its default
    pub fn new() -> Self {
        EngineConfig {
            max_state_payload_bytes: DEFAULT_MAX_STATE_PAYLOAD_BYTES,
        }
    }

    /// Override the payload size cap
    pub fn with_max_state_payload_bytes(mut self, bytes: usize) -> Self {
        self.max_state_payload_bytes = bytes;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
