//! Event types for different topics.

use serde::{Deserialize, Serialize};

use sim_core::{AbilityId, ActorId, CastError, SpellId, StatKind, Tick};

use crate::brain::BrainState;

/// Events produced by casting schedulers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CastingEvent {
    /// A timed action became active.
    Started {
        actor: ActorId,
        spell: SpellId,
        at: Tick,
    },
    /// An action completed. Instant actions never occupied a slot.
    Completed {
        actor: ActorId,
        spell: SpellId,
        target: Option<ActorId>,
        instant: bool,
        at: Tick,
    },
    /// A request was kept as the follow-up action.
    Queued {
        actor: ActorId,
        spell: SpellId,
        replaced: Option<SpellId>,
    },
    /// A focus action was replaced by a newer request.
    Preempted {
        actor: ActorId,
        previous: SpellId,
        spell: SpellId,
    },
    /// A request was refused by the admission rules.
    Rejected {
        actor: ActorId,
        spell: SpellId,
        error: CastError,
    },
    /// A request could not be turned into a runnable action.
    Discarded {
        actor: ActorId,
        spell: SpellId,
        reason: String,
    },
    /// The active action was interrupted.
    Interrupted {
        actor: ActorId,
        spell: SpellId,
        at: Tick,
    },
    /// Both slots were dropped without feedback.
    Cleared { actor: ActorId },
    AbilityUsed {
        actor: ActorId,
        ability: AbilityId,
    },
    AbilityFailed {
        actor: ActorId,
        ability: AbilityId,
        reason: String,
    },
    /// The actor had no work left and left the tick registry.
    Released { actor: ActorId, at: Tick },
}

/// Events produced by behavior state machines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrainEvent {
    Transition {
        actor: ActorId,
        from: BrainState,
        to: BrainState,
        at: Tick,
    },
    Died {
        actor: ActorId,
        at: Tick,
    },
    Revived {
        actor: ActorId,
        at: Tick,
    },
}

/// Why a standing effect did not take hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResistReason {
    AlreadyPresent,
    NoTarget,
}

/// Events produced by the standing effect pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectEvent {
    Applied {
        owner: ActorId,
        caster: ActorId,
        spell: SpellId,
        stat: StatKind,
        amount: i32,
    },
    Resisted {
        owner: ActorId,
        caster: ActorId,
        spell: SpellId,
        reason: ResistReason,
    },
    Cancelled {
        owner: ActorId,
        spell: SpellId,
    },
    /// Duration ran out; the bonus has been removed.
    Expired {
        owner: ActorId,
        spell: SpellId,
    },
    CancelFailed {
        owner: ActorId,
        spell: SpellId,
    },
}
