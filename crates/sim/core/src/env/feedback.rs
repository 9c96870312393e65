use crate::action::{AbilityId, SpellId};
use crate::state::ActorId;

use super::CastFailedReason;

/// Who should see a piece of feedback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Audience {
    /// Only the acting actor's controller.
    Owner,
    /// Everyone within visibility distance of the actor.
    Nearby,
}

/// Observer-facing messages produced by the scheduler.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Feedback {
    /// A request was discarded before it could be admitted.
    CastFailed {
        spell: SpellId,
        reason: CastFailedReason,
    },
    /// A non-instant request arrived mid-cast without follow-up casting.
    AlreadyCasting { spell: SpellId },
    /// A non-instant request was kept as the follow-up.
    QueuedAsFollowUp { spell: SpellId },
    /// A song was requested while another song is playing.
    AlreadyPerforming { spell: SpellId },
    /// The active song must finish first.
    MustWait { spell: SpellId, seconds: u64 },
    /// A cast in progress was interrupted.
    Interrupted { spell: SpellId },
    /// An ability refused to execute.
    AbilityFailed { ability: AbilityId, reason: String },
}

impl Feedback {
    /// Stable identifier used in logs.
    pub fn code(&self) -> &'static str {
        match self {
            Feedback::CastFailed { .. } => "cast_failed",
            Feedback::AlreadyCasting { .. } => "already_casting",
            Feedback::QueuedAsFollowUp { .. } => "queued_as_follow_up",
            Feedback::AlreadyPerforming { .. } => "already_performing",
            Feedback::MustWait { .. } => "must_wait",
            Feedback::Interrupted { .. } => "interrupted",
            Feedback::AbilityFailed { .. } => "ability_failed",
        }
    }
}

/// Receives observer feedback. Implementations must not block.
pub trait FeedbackSink: Send + Sync {
    fn send(&self, actor: ActorId, audience: Audience, feedback: Feedback);
}

/// Sink that drops everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullFeedback;

impl FeedbackSink for NullFeedback {
    fn send(&self, _actor: ActorId, _audience: Audience, _feedback: Feedback) {}
}
