use crate::action::{AbilityError, AbilityId, ActionOutcome, SpellId};
use crate::state::{ActorId, Position, ResourceLevels, StatusFlags};

/// Why a cast failed before it was ever queued.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum CastFailedReason {
    CrowdControlled,
    InvalidRequest,
}

/// Notifications delivered to an actor's own event hooks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActorEvent {
    CastFailed(CastFailedReason),
    CastStarted(SpellId),
    CastFinished(SpellId),
    CastInterrupted(SpellId),
}

/// Capability interface of an actor as seen by the casting scheduler.
///
/// Actor-kind specifics (players queue follow-up casts, controlled pets do
/// too, wild mobs do not) are expressed through these methods rather than
/// type checks. Implementations use interior mutability because the same
/// actor is shared between producers and the simulation loop.
pub trait Actor: Send + Sync {
    fn id(&self) -> ActorId;

    fn status(&self) -> StatusFlags;

    fn position(&self) -> Position;

    /// Target currently selected by the actor, if any.
    fn current_target(&self) -> Option<ActorId>;

    fn resources(&self) -> ResourceLevels;

    /// Whether a non-instant request arriving mid-cast is kept as a
    /// follow-up instead of being rejected.
    fn supports_follow_up_casting(&self) -> bool;

    /// Whether exclusivity classes (songs) restrict this actor.
    fn enforces_cast_exclusivity(&self) -> bool {
        false
    }

    fn notify(&self, event: ActorEvent);

    /// Called once for every action that completes for this actor.
    fn on_cast_complete(&self, _outcome: &ActionOutcome) {}

    /// Runs an ability synchronously.
    fn execute_ability(&self, ability: AbilityId) -> Result<(), AbilityError>;
}
