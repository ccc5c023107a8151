//! Main entry point for gantry.
//!
//! This module provides the `Gantry` struct, the primary entry point for
//! all orchestration operations.

use crate::api::{Groups, Limits, Runs, States};
use gantry_engine::{Engine, EngineConfig, EngineMetrics};
use std::sync::Arc;

/// The gantry orchestrator.
///
/// This is the main entry point for all run-state operations. Create one
/// with [`Gantry::new`] or [`Gantry::builder`]; it is entirely in-memory
/// and needs no teardown.
///
/// # Example
///
/// ```ignore
/// use gantry::prelude::*;
///
/// let db = Gantry::new();
///
/// // Configure admission and create work
/// db.limits.set("gpu", 1);
/// let flow = db.runs.create_flow(tenant, group, vec!["gpu".into()])?;
///
/// // Drive the run through its lifecycle
/// db.states.set(&[
///     TransitionRequest::new(flow.id, StatePayload::new(StateTag::Submitted)),
/// ])?;
/// ```
pub struct Gantry {
    /// The underlying engine
    pub(crate) inner: Arc<Engine>,

    /// Run catalog operations
    pub runs: Runs,

    /// Batch transition and cancellation operations
    pub states: States,

    /// Concurrency limit operations
    pub limits: Limits,

    /// Flow group settings
    pub groups: Groups,
}

impl Gantry {
    /// Create an orchestrator with default configuration.
    pub fn new() -> Self {
        Self::from_engine(Arc::new(Engine::new()))
    }

    /// Create an orchestrator with explicit configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        Self::from_engine(Arc::new(Engine::with_config(config)))
    }

    /// Create a builder for orchestrator configuration.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let db = Gantry::builder()
    ///     .max_state_payload_bytes(512 * 1024)
    ///     .build();
    /// ```
    pub fn builder() -> GantryBuilder {
        GantryBuilder::new()
    }

    /// Get engine metrics.
    pub fn metrics(&self) -> EngineMetrics {
        self.inner.metrics()
    }

    /// Create Gantry from an engine.
    fn from_engine(engine: Arc<Engine>) -> Self {
        Self {
            runs: Runs::new(engine.clone()),
            states: States::new(engine.clone()),
            limits: Limits::new(engine.clone()),
            groups: Groups::new(engine.clone()),
            inner: engine,
        }
    }
}

impl Default for Gantry {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for orchestrator configuration.
///
/// # Example
///
/// ```ignore
/// // Tighten the payload cap for an abuse-sensitive deployment
/// let db = Gantry::builder()
///     .max_state_payload_bytes(64 * 1024)
///     .build();
/// ```
pub struct GantryBuilder {
    config: EngineConfig,
}

impl GantryBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    /// Cap the serialized size of state payloads, per item and per batch.
    pub fn max_state_payload_bytes(mut self, bytes: usize) -> Self {
        self.config = self.config.with_max_state_payload_bytes(bytes);
        self
    }

    /// Build the orchestrator.
    pub fn build(self) -> Gantry {
        Gantry::with_config(self.config)
    }
}

impl Default for GantryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
