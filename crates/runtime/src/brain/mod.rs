//! Behavior state machine for autonomous actors.
//!
//! Every brain is a [`state_machine::StateMachine`] over [`BrainState`]
//! with a [`BrainContext`] blackboard. States share one priority list of
//! transition predicates (see [`rules`]) and add their own local behavior:
//! resting, roaming, fighting, walking home.
//!
//! A brain is also a producer for its actor's casting scheduler: defensive
//! and offensive spells go through the same [`CastingHandle`] a player
//! connection would use.
//!
//! [`CastingHandle`]: crate::casting::CastingHandle

mod body;
mod context;
mod driver;
mod hooks;
pub mod rules;
mod states;

use serde::{Deserialize, Serialize};

pub use body::{AmbientTrigger, Body, SpellChoice};
pub use context::{BrainContext, BrainSettings};
pub use driver::Brain;
pub use hooks::{BrainHook, OpportunisticCast, ResetOnDisengage};

/// Identifier of each behavior state.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BrainState {
    WakingUp,
    Idle,
    FollowLeader,
    Aggro,
    Roaming,
    Camp,
    ReturnToSpawn,
    Patrolling,
    Dead,
}

impl BrainState {
    pub const ALL: [BrainState; 9] = [
        BrainState::WakingUp,
        BrainState::Idle,
        BrainState::FollowLeader,
        BrainState::Aggro,
        BrainState::Roaming,
        BrainState::Camp,
        BrainState::ReturnToSpawn,
        BrainState::Patrolling,
        BrainState::Dead,
    ];
}
