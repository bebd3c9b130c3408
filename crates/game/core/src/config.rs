/// Calendar rules and tunable engine parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProgressionConfig {
    /// Prefix prepended to a skill id to form its modifier source key.
    pub skill_source_prefix: String,
}

impl ProgressionConfig {
    // ===== calendar constants =====
    pub const HOURS_PER_DAY: f32 = 24.0;
    pub const DAYS_PER_WEEK: u32 = 7;
    /// Fixed month length; there are no leap rules.
    pub const DAYS_PER_MONTH: u32 = 30;
    pub const MONTHS_PER_YEAR: u32 = 12;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_SKILL_SOURCE_PREFIX: &'static str = "skill_";

    pub fn new() -> Self {
        Self {
            skill_source_prefix: Self::DEFAULT_SKILL_SOURCE_PREFIX.to_string(),
        }
    }

    /// Modifier source key used for a skill's stat boosts (`skill_<id>`).
    pub fn skill_source(&self, skill_id: &str) -> String {
        format!("{}{}", self.skill_source_prefix, skill_id)
    }
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self::new()
    }
}
