//! Read-only content consulted when an engine is built or restored.
//!
//! The engine never reaches out for configuration on its own: callers hand a
//! [`DefinitionOracle`] to [`ProgressionEngine::from_definitions`] or
//! [`ProgressionEngine::restore`] and the engine copies what it needs.
//!
//! [`ProgressionEngine::from_definitions`]: crate::ProgressionEngine::from_definitions
//! [`ProgressionEngine::restore`]: crate::ProgressionEngine::restore
mod snapshot;

pub use snapshot::DefinitionSnapshot;

use crate::config::ProgressionConfig;
use crate::credit::CreditConfig;
use crate::skills::SkillDefinition;
use crate::stats::StatDefinition;
use crate::time::TimeConfig;

/// Oracle supplying stat, time-block, skill and credit definitions.
pub trait DefinitionOracle: Send + Sync {
    fn stat_definitions(&self) -> &[StatDefinition];
    fn time_config(&self) -> &TimeConfig;
    fn skill_definitions(&self) -> &[SkillDefinition];
    fn credit_config(&self) -> &CreditConfig;

    /// Engine tunables. Defaults apply unless the content overrides them.
    fn progression_config(&self) -> ProgressionConfig {
        ProgressionConfig::default()
    }
}
