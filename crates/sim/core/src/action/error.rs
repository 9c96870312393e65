//! Action admission and construction errors.

use crate::error::{ErrorSeverity, GameError};

use super::{AbilityId, SpellId};

// ============================================================================
// Admission Errors
// ============================================================================

/// Reasons a cast request is refused. None of these are fatal: the request
/// is dropped and observers are told why.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CastError {
    /// Actor is stunned, mezzed, silenced or otherwise incapacitated.
    #[error("Actor cannot cast right now")]
    Incapacitated,

    /// Another action is active and follow-up casting is disabled.
    #[error("Already casting")]
    AlreadyCasting,

    /// The active action holds the same exclusivity class.
    #[error("Already performing")]
    AlreadyPerforming,

    /// The active action holds a different exclusivity class.
    #[error("Must wait {remaining_ms}ms before casting")]
    MustWait { remaining_ms: u64 },
}

impl CastError {
    /// Whole seconds reported to players for a wait, always at least one.
    pub fn wait_seconds(remaining_ms: u64) -> u64 {
        remaining_ms / 1000 + 1
    }
}

impl GameError for CastError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        use CastError::*;
        match self {
            Incapacitated => "CAST_INCAPACITATED",
            AlreadyCasting => "CAST_ALREADY_CASTING",
            AlreadyPerforming => "CAST_ALREADY_PERFORMING",
            MustWait { .. } => "CAST_MUST_WAIT",
        }
    }
}

// ============================================================================
// Construction Errors
// ============================================================================

/// Errors raised while turning a cast request into a runnable action.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// The provider does not know the spell.
    #[error("Unknown spell {0}")]
    UnknownSpell(SpellId),

    /// The spell needs a target and none could be bound.
    #[error("{0} requires a target")]
    NoTarget(SpellId),

    /// The provider refused the request for its own reasons.
    #[error("Cannot build {spell}: {reason}")]
    Rejected { spell: SpellId, reason: String },
}

impl GameError for BuildError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        use BuildError::*;
        match self {
            UnknownSpell(_) => "BUILD_UNKNOWN_SPELL",
            NoTarget(_) => "BUILD_NO_TARGET",
            Rejected { .. } => "BUILD_REJECTED",
        }
    }
}

// ============================================================================
// Ability Errors
// ============================================================================

/// Errors reported by an actor when an ability cannot execute.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AbilityError {
    #[error("{0} is not available")]
    Unavailable(AbilityId),

    #[error("{0} is on cooldown")]
    OnCooldown(AbilityId),

    #[error("{ability} failed: {reason}")]
    Failed { ability: AbilityId, reason: String },
}

impl GameError for AbilityError {
    fn severity(&self) -> ErrorSeverity {
        use AbilityError::*;
        match self {
            Unavailable(_) => ErrorSeverity::Validation,
            OnCooldown(_) => ErrorSeverity::Recoverable,
            Failed { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        use AbilityError::*;
        match self {
            Unavailable(_) => "ABILITY_UNAVAILABLE",
            OnCooldown(_) => "ABILITY_ON_COOLDOWN",
            Failed { .. } => "ABILITY_FAILED",
        }
    }
}
