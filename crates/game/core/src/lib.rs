//! Deterministic progression rules for a role-playing game.
//!
//! `progression-core` models one player's stats, calendar time blocks,
//! skills and social-credit standing as plain values with no engine or I/O
//! dependencies. Hosts own a [`ProgressionEngine`], advance it with explicit
//! deltas, receive notifications through an [`EventSink`] and persist it as a
//! [`ProgressionSnapshot`].
pub mod config;
pub mod credit;
pub mod engine;
pub mod env;
pub mod error;
pub mod events;
pub mod skills;
pub mod snapshot;
pub mod stats;
pub mod time;

pub use config::ProgressionConfig;
pub use credit::{CreditConfig, CreditLedger, CreditSnapshot, CreditTier, TierChange};
pub use engine::ProgressionEngine;
pub use env::{DefinitionOracle, DefinitionSnapshot};
pub use error::{DefinitionError, ErrorSeverity, GameError};
pub use events::{EventSink, NullSink, ProgressionEvent};
pub use skills::{Skill, SkillBook, SkillDefinition, SkillEffect, SkillSnapshot, propagate};
pub use snapshot::{ProgressionSnapshot, SnapshotError};
pub use stats::{
    Modifier, ModifierKind, Stat, StatDefinition, StatEngine, StatSnapshot, StatValue,
    StatsSnapshot,
};
pub use time::{
    AllocationError, Clock, DayOfWeek, ScheduleState, TimeBlock, TimeBlockTemplate, TimeConfig,
    TimeScheduler, TimeSnapshot,
};
