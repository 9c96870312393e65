//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, brain construction and scenario
//! loading so clients can bubble them up with consistent context.
use std::path::PathBuf;

use thiserror::Error;
use tokio::sync::oneshot;

use sim_core::{ActorId, ErrorSeverity, GameError};
use state_machine::BuildError;

use crate::brain::BrainState;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("brain state table is incomplete: {0}")]
    BrainTable(#[from] BuildError<BrainState>),

    #[error("actor {0} is not attached")]
    UnknownActor(ActorId),

    #[error("actor {0} is already attached")]
    AlreadyAttached(ActorId),

    #[error("failed to read scenario {path}")]
    ScenarioIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scenario")]
    ScenarioParse(#[from] ron::error::SpannedError),

    #[error("invalid scenario: {0}")]
    InvalidScenario(String),
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownActor(_) | Self::AlreadyAttached(_) => ErrorSeverity::Recoverable,
            Self::ScenarioIo { .. } | Self::ScenarioParse(_) | Self::InvalidScenario(_) => {
                ErrorSeverity::Validation
            }
            Self::CommandChannelClosed
            | Self::ReplyChannelClosed(_)
            | Self::WorkerJoin(_)
            | Self::BrainTable(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::CommandChannelClosed => "RUNTIME_COMMAND_CHANNEL_CLOSED",
            Self::ReplyChannelClosed(_) => "RUNTIME_REPLY_CHANNEL_CLOSED",
            Self::WorkerJoin(_) => "RUNTIME_WORKER_JOIN",
            Self::BrainTable(_) => "RUNTIME_BRAIN_TABLE",
            Self::UnknownActor(_) => "RUNTIME_UNKNOWN_ACTOR",
            Self::AlreadyAttached(_) => "RUNTIME_ALREADY_ATTACHED",
            Self::ScenarioIo { .. } => "RUNTIME_SCENARIO_IO",
            Self::ScenarioParse(_) => "RUNTIME_SCENARIO_PARSE",
            Self::InvalidScenario(_) => "RUNTIME_INVALID_SCENARIO",
        }
    }
}
