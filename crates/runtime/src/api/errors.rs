//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination and from the maze core so clients
//! can bubble them up with consistent context.

use thiserror::Error;
use tokio::sync::oneshot;

use maze_core::{ErrorSeverity, GenerateError, SimError, StepError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error(transparent)]
    Step(#[from] StepError),
}

impl RuntimeError {
    /// Severity of the underlying failure. Lost channels mean the worker is
    /// gone, which nothing short of a new runtime recovers from.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Generate(error) => error.severity(),
            Self::Step(error) => error.severity(),
            Self::CommandChannelClosed | Self::ReplyChannelClosed(_) | Self::WorkerJoin(_) => {
                ErrorSeverity::Internal
            }
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Generate(error) => error.error_code(),
            Self::Step(error) => error.error_code(),
            Self::CommandChannelClosed => "command_channel_closed",
            Self::ReplyChannelClosed(_) => "reply_channel_closed",
            Self::WorkerJoin(_) => "worker_join",
        }
    }
}
