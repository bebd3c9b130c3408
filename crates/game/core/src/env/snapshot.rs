use super::DefinitionOracle;
use crate::config::ProgressionConfig;
use crate::credit::CreditConfig;
use crate::skills::SkillDefinition;
use crate::stats::StatDefinition;
use crate::time::TimeConfig;

/// Owned bundle of every definition, usable directly as an oracle.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DefinitionSnapshot {
    pub stats: Vec<StatDefinition>,
    pub time: TimeConfig,
    pub skills: Vec<SkillDefinition>,
    pub credit: CreditConfig,
    pub config: ProgressionConfig,
}

impl DefinitionSnapshot {
    pub fn new(
        stats: Vec<StatDefinition>,
        time: TimeConfig,
        skills: Vec<SkillDefinition>,
        credit: CreditConfig,
    ) -> Self {
        Self {
            stats,
            time,
            skills,
            credit,
            config: ProgressionConfig::default(),
        }
    }

    /// Copy every definition out of another oracle.
    pub fn from_oracle(oracle: &dyn DefinitionOracle) -> Self {
        Self {
            stats: oracle.stat_definitions().to_vec(),
            time: oracle.time_config().clone(),
            skills: oracle.skill_definitions().to_vec(),
            credit: oracle.credit_config().clone(),
            config: oracle.progression_config(),
        }
    }

    pub fn with_config(mut self, config: ProgressionConfig) -> Self {
        self.config = config;
        self
    }
}

impl DefinitionOracle for DefinitionSnapshot {
    fn stat_definitions(&self) -> &[StatDefinition] {
        &self.stats
    }

    fn time_config(&self) -> &TimeConfig {
        &self.time
    }

    fn skill_definitions(&self) -> &[SkillDefinition] {
        &self.skills
    }

    fn credit_config(&self) -> &CreditConfig {
        &self.credit
    }

    fn progression_config(&self) -> ProgressionConfig {
        self.config.clone()
    }
}
