//! Skill definition loader.

use std::path::Path;

use progression_core::SkillDefinition;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Skill catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillCatalog {
    pub skills: Vec<SkillDefinition>,
}

/// Loader for skill definitions from RON files.
pub struct SkillLoader;

impl SkillLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<SkillDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<SkillDefinition>> {
        let catalog: SkillCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse skill catalog RON: {}", e))?;

        Ok(catalog.skills)
    }
}

#[cfg(test)]
mod tests {
    use progression_core::SkillEffect;

    use super::*;

    #[test]
    fn parses_effects_and_defaults() {
        let skills = SkillLoader::parse(
            r#"(skills: [
                (
                    id: "sword",
                    name: "Swordsmanship",
                    effects: [
                        StatBoost(stat: "strength", value_per_level: 1.5),
                        Unlock(feature: "parry", at_level: 3),
                    ],
                ),
            ])"#,
        )
        .unwrap();

        let sword = &skills[0];
        assert_eq!(sword.max_level, SkillDefinition::DEFAULT_MAX_LEVEL);
        assert_eq!(sword.base_threshold, SkillDefinition::DEFAULT_THRESHOLD);
        assert_eq!(
            sword.effects[0],
            SkillEffect::StatBoost {
                stat: "strength".into(),
                value_per_level: 1.5
            }
        );
    }
}
