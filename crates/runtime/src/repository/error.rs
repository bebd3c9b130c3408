//! Error types raised by repository implementations.

use thiserror::Error;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("state repository lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("invalid save slot name '{0}'")]
    InvalidSlot(String),
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
