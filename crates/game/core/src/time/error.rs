//! Time-block allocation errors.

use crate::error::{ErrorSeverity, GameError};

/// Reasons a block cannot be reserved. The block is left unchanged.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AllocationError {
    #[error("time block {0} does not exist")]
    UnknownBlock(u32),

    #[error("time block {block} is already allocated to '{activity}'")]
    Unavailable { block: u32, activity: String },

    #[error("time block {block} ended at {end_hour}:00, current hour is {hour}")]
    Elapsed { block: u32, end_hour: u8, hour: f32 },
}

impl GameError for AllocationError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            AllocationError::UnknownBlock(_) => ErrorSeverity::Validation,
            AllocationError::Unavailable { .. } | AllocationError::Elapsed { .. } => {
                ErrorSeverity::Recoverable
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AllocationError::UnknownBlock(_) => "ALLOCATION_UNKNOWN_BLOCK",
            AllocationError::Unavailable { .. } => "ALLOCATION_UNAVAILABLE",
            AllocationError::Elapsed { .. } => "ALLOCATION_ELAPSED",
        }
    }
}
