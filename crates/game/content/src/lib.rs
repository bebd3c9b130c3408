//! Data-driven progression content.
//!
//! This crate loads the read-only definitions consumed by
//! [`progression_core::ProgressionEngine`]:
//! - Stat definitions (RON)
//! - Skill definitions and their effects (RON)
//! - Calendar start, daily time blocks and activity costs (TOML)
//! - Social-credit bounds and tiers (TOML)
//!
//! Content never appears in engine snapshots; it is consulted when an engine
//! is built or restored.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ContentFactory, CreditLoader, LoadResult, SkillLoader, StatLoader, TimeLoader};
