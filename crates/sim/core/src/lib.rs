//! Deterministic core of the real-time action resolution layer.
//!
//! `sim-core` defines the actor and action contracts, the two-slot admission
//! rules that decide what an actor is casting, and the small value types the
//! runtime and behavior layers share. Nothing here owns threads or queues;
//! the runtime crate drives these types from its simulation loop.
pub mod action;
pub mod casting;
pub mod config;
pub mod env;
pub mod error;
pub mod state;

pub use action::{
    AbilityError, AbilityId, AbilityRequest, ActionOutcome, ActionPhase, ActionRequest,
    BuildError, CastError, CastRequest, ExclusivityClass, RunnableAction, Spell, SpellId,
    SpellLine, StandingEffect, StatKind, TimedCast,
};
pub use casting::{Admission, AdmissionPolicy, Advance, CastSlots};
pub use config::{BrainTuning, FocusPolicy, SimConfig};
pub use env::{
    ActionProvider, Actor, ActorEvent, Audience, CastFailedReason, Feedback, FeedbackSink,
    NullFeedback, PcgRng, RngOracle, StandardActionProvider, compute_seed,
};
pub use error::{ErrorSeverity, GameError};
pub use state::{
    ActorId, GroupView, HostilityTable, Position, ResourceLevels, StatusFlags, Tick,
};
