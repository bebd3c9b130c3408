//! Skill → stat propagation.

use std::collections::BTreeMap;

use super::skill::{SkillBook, SkillEffect};
use crate::config::ProgressionConfig;
use crate::stats::{Modifier, ModifierKind, StatEngine};

/// Refresh every skill's stat boosts on the stat engine.
///
/// Each skill contributes one permanent additive modifier per boosted stat,
/// keyed by `skill_<id>`, worth `value_per_level * level`. The previous
/// modifier from the same source is purged in the same recomputation, so
/// calling this every tick never stacks. Boosts on the same stat from one
/// skill are summed. Boosts naming unknown stats are silently skipped.
pub fn propagate(book: &SkillBook, stats: &mut StatEngine, config: &ProgressionConfig) {
    for skill in book.skills() {
        let mut boosts: BTreeMap<&str, f32> = BTreeMap::new();
        for effect in skill.effects() {
            if let SkillEffect::StatBoost {
                stat,
                value_per_level,
            } = effect
            {
                *boosts.entry(stat.as_str()).or_default() += value_per_level * skill.level() as f32;
            }
        }

        if boosts.is_empty() {
            continue;
        }
        let source = config.skill_source(skill.id());
        for (stat, value) in boosts {
            stats.replace_source_modifier(
                stat,
                Modifier::permanent(source.clone(), value, ModifierKind::Additive),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::SkillDefinition;
    use crate::stats::StatDefinition;

    fn setup() -> (SkillBook, StatEngine) {
        let skills = SkillBook::new(&[SkillDefinition::new("sword", "Sword")
            .with_threshold(100.0, 1.0)
            .with_effect(SkillEffect::StatBoost {
                stat: "strength".into(),
                value_per_level: 2.0,
            })
            .with_effect(SkillEffect::StatBoost {
                stat: "mana".into(),
                value_per_level: 1.0,
            })])
        .unwrap();
        let stats = StatEngine::new("p1", &[StatDefinition::new("strength", 10.0, 0.0, 100.0)]).unwrap();
        (skills, stats)
    }

    #[test]
    fn repeated_propagation_does_not_stack() {
        let (mut skills, mut stats) = setup();
        let config = ProgressionConfig::default();
        skills.add_experience("sword", 300.0, &mut Vec::new());

        for _ in 0..5 {
            propagate(&skills, &mut stats, &config);
            stats.tick(1.0);
        }

        let strength = stats.stat("strength").unwrap();
        assert_eq!(strength.modifiers().len(), 1);
        assert_eq!(strength.modifiers()[0].source, "skill_sword");
        assert_eq!(strength.current_value(), 16.0);
    }

    #[test]
    fn level_change_replaces_contribution() {
        let (mut skills, mut stats) = setup();
        let config = ProgressionConfig::default();

        propagate(&skills, &mut stats, &config);
        assert_eq!(stats.current("strength"), 10.0);

        skills.add_experience("sword", 100.0, &mut Vec::new());
        propagate(&skills, &mut stats, &config);
        assert_eq!(stats.current("strength"), 12.0);
        assert_eq!(stats.stat("strength").unwrap().modifiers().len(), 1);
    }

    #[test]
    fn other_sources_survive_propagation() {
        let (skills, mut stats) = setup();
        stats.apply_modifier(
            "strength",
            Modifier::timed("potion_effect", 5.0, ModifierKind::Additive, 10.0),
        );
        propagate(&skills, &mut stats, &ProgressionConfig::default());
        assert_eq!(stats.stat("strength").unwrap().modifiers().len(), 2);
        assert_eq!(stats.current("strength"), 15.0);
    }
}
