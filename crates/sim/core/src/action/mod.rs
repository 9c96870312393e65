//! Action definitions and the runnable action contract.
//!
//! A producer describes *what* it wants with an [`ActionRequest`]. The
//! scheduler turns a cast request into a [`RunnableAction`] through an
//! [`ActionProvider`](crate::env::ActionProvider), and advances it one game
//! tick at a time until it reports [`ActionPhase::Complete`] or
//! [`ActionPhase::Interrupted`].
mod error;
mod request;
mod runnable;
mod spell;

pub use error::{AbilityError, BuildError, CastError};
pub use request::{AbilityRequest, ActionRequest, CastRequest};
pub use runnable::{ActionOutcome, ActionPhase, RunnableAction, TimedCast};
pub use spell::{AbilityId, ExclusivityClass, Spell, SpellId, SpellLine, StandingEffect, StatKind};
