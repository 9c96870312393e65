//! Runtime orchestration for the real-time casting simulation.
//!
//! This crate wires the per-actor casting schedulers, the behavior state
//! machines and the standing effect pipeline into one simulation worker.
//! Consumers embed [`Runtime`] to advance game time, attach actors and
//! subscribe to events through [`RuntimeHandle`]. Producers on any thread
//! submit requests through a [`CastingHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`casting`] owns admission and the tick registry
//! - [`brain`] holds the behavior states and their shared rules
//! - [`effects`] consumes completed casts
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`scenario`] replays scripted RON scenarios
//! - [`workers`] keeps background tasks internal to the crate
pub mod api;
pub mod brain;
pub mod casting;
pub mod effects;
pub mod events;
pub mod runtime;
pub mod scenario;

mod workers;

pub use api::{Result, RuntimeError, RuntimeHandle};
pub use brain::{
    AmbientTrigger, Body, Brain, BrainContext, BrainHook, BrainSettings, BrainState,
    OpportunisticCast, ResetOnDisengage, SpellChoice,
};
pub use casting::{CastingDirectory, CastingHandle, CastingScheduler, CastingService, TickRegistry};
pub use effects::{EffectInstance, EffectList, EffectOp, EffectPipeline};
pub use events::{BrainEvent, CastingEvent, EffectEvent, Event, EventBus, ResistReason, Topic};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use scenario::{Scenario, ScenarioRunner, SceneActor, SceneWorld};
pub use workers::ActorSnapshot;
