//! Common error infrastructure for progression-core.
//!
//! This module provides the shared severity classification and the
//! [`GameError`] trait implemented by every error enum in the crate.
//! Domain-specific errors are defined next to the subsystem that raises them
//! (e.g. [`AllocationError`](crate::time::AllocationError) in the scheduler).
//!
//! Lookup misses (unknown stat, skill or activity ids) are never errors: those
//! operations degrade to no-ops or zeroed sentinels so a live simulation frame
//! is never halted. Errors are reserved for malformed definitions, rejected
//! time-block allocations and structurally invalid snapshots.

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry later or with different arguments.
    ///
    /// Examples: time block already taken, slot already elapsed
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: unknown block id, malformed definition
    Validation,

    /// Internal error - unexpected state inconsistency.
    Internal,

    /// Fatal error - the engine cannot be constructed or restored.
    ///
    /// Examples: corrupted snapshot, inverted stat bounds
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

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all progression-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Errors raised while building an engine from configuration.
///
/// This is the one place where the engine fails hard: definitions are checked
/// once, before the first tick.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DefinitionError {
    #[error("stat '{id}' has inverted bounds (min {min} > max {max})")]
    InvertedBounds { id: String, min: f32, max: f32 },

    #[error("stat '{id}' has a non-finite base or bound")]
    NonFiniteStat { id: String },

    #[error("stat '{0}' is defined more than once")]
    DuplicateStat(String),

    #[error("time block {id} spans {start}..{end}, expected start < end <= 24")]
    InvalidBlockHours { id: u32, start: u8, end: u8 },

    #[error("time block {0} is defined more than once")]
    DuplicateBlock(u32),

    #[error("starting clock is out of range: {0}")]
    InvalidClock(&'static str),

    #[error("skill '{0}' is defined more than once")]
    DuplicateSkill(String),

    #[error("skill '{id}' has a non-positive level threshold")]
    InvalidThreshold { id: String },

    #[error("credit ledger requires at least one tier")]
    NoCreditTiers,

    #[error("credit bounds are inverted (min {min} > max {max})")]
    InvertedCreditBounds { min: f32, max: f32 },
}

impl GameError for DefinitionError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        use DefinitionError::*;
        match self {
            InvertedBounds { .. } => "DEFINITION_INVERTED_BOUNDS",
            NonFiniteStat { .. } => "DEFINITION_NON_FINITE_STAT",
            DuplicateStat(_) => "DEFINITION_DUPLICATE_STAT",
            InvalidBlockHours { .. } => "DEFINITION_INVALID_BLOCK_HOURS",
            DuplicateBlock(_) => "DEFINITION_DUPLICATE_BLOCK",
            InvalidClock(_) => "DEFINITION_INVALID_CLOCK",
            DuplicateSkill(_) => "DEFINITION_DUPLICATE_SKILL",
            InvalidThreshold { .. } => "DEFINITION_INVALID_THRESHOLD",
            NoCreditTiers => "DEFINITION_NO_CREDIT_TIERS",
            InvertedCreditBounds { .. } => "DEFINITION_INVERTED_CREDIT_BOUNDS",
        }
    }
}
