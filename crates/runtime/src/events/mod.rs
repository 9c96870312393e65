//! Topic-based event bus for runtime events.
//!
//! Casting schedulers, brains and the effect pipeline report what happened
//! as typed events; consumers subscribe only to the topics they need.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{BrainEvent, CastingEvent, EffectEvent, ResistReason};
