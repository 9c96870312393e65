//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker, wires up command/event channels,
//! and exposes a builder-based API for clients to drive the simulation.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use sim_core::{
    ActionProvider, FeedbackSink, NullFeedback, PcgRng, RngOracle, SimConfig,
    StandardActionProvider,
};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::casting::CastingService;
use crate::events::EventBus;
use crate::workers::SimulationWorker;

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub sim: SimConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Seed for every behavior roll; the same seed replays a scenario.
    pub seed: u64,
}

impl RuntimeConfig {
    pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;
    pub const DEFAULT_COMMAND_BUFFER_SIZE: usize = 32;

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            sim: SimConfig::default(),
            event_buffer_size: Self::DEFAULT_EVENT_BUFFER_SIZE,
            command_buffer_size: Self::DEFAULT_COMMAND_BUFFER_SIZE,
            seed: 0,
        }
    }
}

/// Main runtime that orchestrates the simulation
///
/// Design: Runtime owns the worker task; [`RuntimeHandle`] provides a
/// cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    sim_worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Shutdown the runtime gracefully
    ///
    /// The worker stops once every outstanding handle has been dropped.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    provider: Option<Arc<dyn ActionProvider>>,
    feedback: Option<Arc<dyn FeedbackSink>>,
    rng: Option<Arc<dyn RngOracle>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            provider: None,
            feedback: None,
            rng: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Override how cast requests become runnable actions.
    ///
    /// Defaults to [`StandardActionProvider`].
    pub fn provider(mut self, provider: Arc<dyn ActionProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the observer feedback sink. Defaults to [`NullFeedback`].
    pub fn feedback(mut self, feedback: Arc<dyn FeedbackSink>) -> Self {
        self.feedback = Some(feedback);
        self
    }

    /// Override the dice used by brains. Defaults to [`PcgRng`].
    pub fn rng(mut self, rng: Arc<dyn RngOracle>) -> Self {
        self.rng = Some(rng);
        self
    }

    /// Spawns the simulation worker and returns the running runtime.
    pub async fn build(self) -> Result<Runtime> {
        let RuntimeBuilder {
            config,
            provider,
            feedback,
            rng,
        } = self;

        let provider = provider.unwrap_or_else(|| Arc::new(StandardActionProvider));
        let feedback = feedback.unwrap_or_else(|| Arc::new(NullFeedback));
        let rng = rng.unwrap_or_else(|| Arc::new(PcgRng));

        let (command_tx, command_rx) = mpsc::channel(config.command_buffer_size);
        let event_bus = EventBus::with_capacity(config.event_buffer_size);

        let casting = CastingService::new(provider, feedback, config.sim.focus_policy);
        let worker = SimulationWorker::new(
            config.sim.clone(),
            casting,
            rng,
            config.seed,
            command_rx,
            event_bus.clone(),
        );
        let sim_worker_handle = tokio::spawn(worker.run());

        info!(
            target: "runtime::worker",
            tick_interval_ms = config.sim.tick_interval_ms,
            "runtime started"
        );

        Ok(Runtime {
            handle: RuntimeHandle::new(command_tx, event_bus),
            sim_worker_handle,
        })
    }
}
