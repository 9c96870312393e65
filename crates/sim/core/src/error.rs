//! Common error infrastructure for sim-core.
//!
//! Domain errors (`CastError`, `BuildError`, `AbilityError`) live next to the
//! code that produces them. This module only holds the classification shared
//! by all of them.

/// Severity level of an error, used to pick a handling strategy.
///
/// - **Recoverable**: the actor may succeed later (busy, waiting on a song)
/// - **Validation**: the request itself is malformed and is discarded
/// - **Internal**: an inconsistency between collaborators that needs a look
/// - **Fatal**: the simulation cannot continue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ErrorSeverity {
    /// Temporary condition; retrying later can succeed.
    ///
    /// Examples: already casting, must wait for a song to finish
    Recoverable,

    /// Invalid input; retrying unchanged will fail again.
    ///
    /// Examples: unknown spell, missing mandatory target
    Validation,

    /// Unexpected state inconsistency between collaborators.
    Internal,

    /// The simulation loop cannot continue.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates a bug rather than a game condition.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all sim-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for the Display/Error impl
/// - Classify severity by recoverability, not by impact
/// - Give every variant a stable `error_code` so logs can be grepped
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
