//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, repositories, and the core
//! engine so clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use progression_core::{AllocationError, DefinitionError, ErrorSeverity, GameError, SnapshotError};

pub use crate::repository::RepositoryError;

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
    Repository(#[from] RepositoryError),

    #[error("runtime requires definitions to be configured before building")]
    MissingDefinitions,

    #[error("no state repository configured")]
    NoRepository,

    #[error("save slot '{0}' is empty")]
    SlotNotFound(String),

    #[error("failed to build engine from definitions")]
    InitialState(#[source] DefinitionError),

    #[error("failed to restore snapshot")]
    Restore(#[source] SnapshotError),

    #[error(transparent)]
    Allocation(#[from] AllocationError),
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            RuntimeError::Allocation(err) => err.severity(),
            RuntimeError::SlotNotFound(_) | RuntimeError::NoRepository => ErrorSeverity::Validation,
            RuntimeError::MissingDefinitions
            | RuntimeError::InitialState(_)
            | RuntimeError::Restore(_) => ErrorSeverity::Fatal,
            _ => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            RuntimeError::CommandChannelClosed => "RUNTIME_COMMAND_CHANNEL_CLOSED",
            RuntimeError::ReplyChannelClosed(_) => "RUNTIME_REPLY_CHANNEL_CLOSED",
            RuntimeError::WorkerJoin(_) => "RUNTIME_WORKER_JOIN",
            RuntimeError::Repository(_) => "RUNTIME_REPOSITORY",
            RuntimeError::MissingDefinitions => "RUNTIME_MISSING_DEFINITIONS",
            RuntimeError::NoRepository => "RUNTIME_NO_REPOSITORY",
            RuntimeError::SlotNotFound(_) => "RUNTIME_SLOT_NOT_FOUND",
            RuntimeError::InitialState(err) => err.error_code(),
            RuntimeError::Restore(err) => err.error_code(),
            RuntimeError::Allocation(err) => err.error_code(),
        }
    }
}
