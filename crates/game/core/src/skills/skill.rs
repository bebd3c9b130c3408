use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use crate::error::DefinitionError;
use crate::events::{EventSink, ProgressionEvent};
use crate::snapshot::SnapshotError;

/// Passive effect granted by a skill.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillEffect {
    /// Adds `value_per_level * level` to `stat` as a permanent additive
    /// modifier.
    StatBoost { stat: String, value_per_level: f32 },

    /// Makes `feature` available once the skill reaches `at_level`.
    Unlock { feature: String, at_level: u32 },
}

/// Static skill description loaded from content.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillDefinition {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub starting_level: u32,
    #[cfg_attr(feature = "serde", serde(default = "SkillDefinition::default_max_level"))]
    pub max_level: u32,
    /// Experience needed to go from the starting level to the next.
    #[cfg_attr(feature = "serde", serde(default = "SkillDefinition::default_threshold"))]
    pub base_threshold: f32,
    /// Factor applied to the threshold after every level-up.
    #[cfg_attr(feature = "serde", serde(default = "SkillDefinition::default_threshold_growth"))]
    pub threshold_growth: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effects: Vec<SkillEffect>,
}

impl SkillDefinition {
    pub const DEFAULT_MAX_LEVEL: u32 = 10;
    pub const DEFAULT_THRESHOLD: f32 = 100.0;
    pub const DEFAULT_THRESHOLD_GROWTH: f32 = 1.5;

    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            starting_level: 0,
            max_level: Self::DEFAULT_MAX_LEVEL,
            base_threshold: Self::DEFAULT_THRESHOLD,
            threshold_growth: Self::DEFAULT_THRESHOLD_GROWTH,
            effects: Vec::new(),
        }
    }

    pub fn with_effect(mut self, effect: SkillEffect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_threshold(mut self, base_threshold: f32, threshold_growth: f32) -> Self {
        self.base_threshold = base_threshold;
        self.threshold_growth = threshold_growth;
        self
    }

    pub fn with_levels(mut self, starting_level: u32, max_level: u32) -> Self {
        self.starting_level = starting_level;
        self.max_level = max_level;
        self
    }

    #[cfg(feature = "serde")]
    fn default_max_level() -> u32 {
        Self::DEFAULT_MAX_LEVEL
    }

    #[cfg(feature = "serde")]
    fn default_threshold() -> f32 {
        Self::DEFAULT_THRESHOLD
    }

    #[cfg(feature = "serde")]
    fn default_threshold_growth() -> f32 {
        Self::DEFAULT_THRESHOLD_GROWTH
    }

    fn validate(&self) -> Result<(), DefinitionError> {
        let threshold_ok = self.base_threshold.is_finite() && self.base_threshold > 0.0;
        let growth_ok = self.threshold_growth.is_finite() && self.threshold_growth > 0.0;
        if !(threshold_ok && growth_ok) {
            return Err(DefinitionError::InvalidThreshold {
                id: self.id.clone(),
            });
        }
        Ok(())
    }
}

/// Live progress of one skill.
#[derive(Clone, Debug, PartialEq)]
pub struct Skill {
    id: String,
    name: String,
    level: u32,
    experience: f32,
    next_level_threshold: f32,
    max_level: u32,
    threshold_growth: f32,
    effects: Vec<SkillEffect>,
}

impl Skill {
    fn from_definition(def: &SkillDefinition) -> Self {
        Self {
            id: def.id.clone(),
            name: def.name.clone(),
            level: def.starting_level.min(def.max_level),
            experience: 0.0,
            next_level_threshold: def.base_threshold,
            max_level: def.max_level,
            threshold_growth: def.threshold_growth,
            effects: def.effects.clone(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn experience(&self) -> f32 {
        self.experience
    }

    pub fn next_level_threshold(&self) -> f32 {
        self.next_level_threshold
    }

    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    pub fn effects(&self) -> &[SkillEffect] {
        &self.effects
    }

    pub fn is_maxed(&self) -> bool {
        self.level >= self.max_level
    }

    /// Add experience and return the number of levels gained.
    fn gain(&mut self, amount: f32) -> u32 {
        let start = self.level;
        self.experience += amount;
        while !self.is_maxed() && self.experience >= self.next_level_threshold {
            self.experience -= self.next_level_threshold;
            self.level += 1;
            self.next_level_threshold *= self.threshold_growth;
        }
        if self.is_maxed() {
            self.experience = 0.0;
        }
        self.level - start
    }

    fn snapshot(&self) -> SkillSnapshot {
        SkillSnapshot {
            id: self.id.clone(),
            level: self.level,
            experience: self.experience,
            next_level_threshold: self.next_level_threshold,
        }
    }
}

/// Persisted progress of one skill. Names, caps and effects come from content.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillSnapshot {
    pub id: String,
    pub level: u32,
    pub experience: f32,
    pub next_level_threshold: f32,
}

/// Every skill of one player, keyed by id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SkillBook {
    skills: BTreeMap<String, Skill>,
}

impl SkillBook {
    pub fn new(definitions: &[SkillDefinition]) -> Result<Self, DefinitionError> {
        let mut skills = BTreeMap::new();
        for def in definitions {
            def.validate()?;
            if skills
                .insert(def.id.clone(), Skill::from_definition(def))
                .is_some()
            {
                return Err(DefinitionError::DuplicateSkill(def.id.clone()));
            }
        }
        Ok(Self { skills })
    }

    pub fn skill(&self, skill_id: &str) -> Option<&Skill> {
        self.skills.get(skill_id)
    }

    pub fn skills(&self) -> impl Iterator<Item = &Skill> {
        self.skills.values()
    }

    /// Current level; `0` for unknown skills.
    pub fn level(&self, skill_id: &str) -> u32 {
        self.skills.get(skill_id).map_or(0, Skill::level)
    }

    /// Grant experience, publishing one [`ProgressionEvent::SkillLeveledUp`]
    /// per level gained. Returns the number of levels gained.
    ///
    /// Unknown skills and non-positive or non-finite amounts are no-ops.
    pub fn add_experience(&mut self, skill_id: &str, amount: f32, sink: &mut dyn EventSink) -> u32 {
        if !amount.is_finite() || amount <= 0.0 {
            warn!(target: "progression::skills", skill = skill_id, amount, "ignoring invalid experience");
            return 0;
        }
        let Some(skill) = self.skills.get_mut(skill_id) else {
            return 0;
        };
        if skill.is_maxed() {
            return 0;
        }

        let from = skill.level;
        let gained = skill.gain(amount);
        for level in from + 1..=skill.level {
            sink.publish(ProgressionEvent::SkillLeveledUp {
                skill_id: skill.id.clone(),
                level,
            });
        }
        if gained > 0 {
            debug!(
                target: "progression::skills",
                skill = skill_id,
                level = skill.level,
                gained,
                "skill leveled up"
            );
        }
        gained
    }

    /// Features unlocked by any skill at its current level.
    pub fn unlocked_features(&self) -> BTreeSet<&str> {
        self.skills
            .values()
            .flat_map(|skill| {
                skill.effects.iter().filter_map(move |effect| match effect {
                    SkillEffect::Unlock { feature, at_level } if *at_level <= skill.level => {
                        Some(feature.as_str())
                    }
                    _ => None,
                })
            })
            .collect()
    }

    pub fn is_unlocked(&self, feature: &str) -> bool {
        self.unlocked_features().contains(feature)
    }

    pub fn snapshot(&self) -> Vec<SkillSnapshot> {
        self.skills.values().map(Skill::snapshot).collect()
    }

    /// Rebuild from content definitions and persisted progress.
    ///
    /// Progress for skills no longer present in content is dropped; skills
    /// missing from the snapshot start fresh.
    pub fn restore(
        definitions: &[SkillDefinition],
        snapshots: Vec<SkillSnapshot>,
    ) -> Result<Self, SnapshotError> {
        let mut book = Self::new(definitions)?;

        for snapshot in snapshots {
            let Some(skill) = book.skills.get_mut(&snapshot.id) else {
                warn!(target: "progression::skills", skill = %snapshot.id, "dropping progress for unknown skill");
                continue;
            };
            let valid = snapshot.experience.is_finite()
                && snapshot.experience >= 0.0
                && snapshot.next_level_threshold.is_finite()
                && snapshot.next_level_threshold > 0.0
                && snapshot.level <= skill.max_level;
            if !valid {
                return Err(SnapshotError::InvalidSkillProgress(snapshot.id));
            }
            skill.level = snapshot.level;
            skill.experience = snapshot.experience;
            skill.next_level_threshold = snapshot.next_level_threshold;
        }
        Ok(book)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definitions() -> Vec<SkillDefinition> {
        vec![
            SkillDefinition::new("sword", "Swordsmanship")
                .with_threshold(100.0, 2.0)
                .with_levels(0, 3)
                .with_effect(SkillEffect::StatBoost {
                    stat: "strength".into(),
                    value_per_level: 2.0,
                })
                .with_effect(SkillEffect::Unlock {
                    feature: "parry".into(),
                    at_level: 2,
                }),
            SkillDefinition::new("cooking", "Cooking").with_effect(SkillEffect::Unlock {
                feature: "recipes".into(),
                at_level: 0,
            }),
        ]
    }

    #[test]
    fn rejects_duplicates_and_bad_thresholds() {
        let mut defs = definitions();
        defs.push(SkillDefinition::new("sword", "Again"));
        assert_eq!(
            SkillBook::new(&defs).unwrap_err(),
            DefinitionError::DuplicateSkill("sword".into())
        );

        let bad = [SkillDefinition::new("x", "X").with_threshold(0.0, 1.5)];
        assert!(matches!(
            SkillBook::new(&bad),
            Err(DefinitionError::InvalidThreshold { .. })
        ));
    }

    #[test]
    fn experience_carries_over_and_threshold_grows() {
        let mut book = SkillBook::new(&definitions()).unwrap();
        let mut events = Vec::new();

        // 100 for level 1, then 200 for level 2, 50 left over.
        assert_eq!(book.add_experience("sword", 350.0, &mut events), 2);

        let sword = book.skill("sword").unwrap();
        assert_eq!(sword.level(), 2);
        assert_eq!(sword.experience(), 50.0);
        assert_eq!(sword.next_level_threshold(), 400.0);
        assert_eq!(
            events,
            vec![
                ProgressionEvent::SkillLeveledUp {
                    skill_id: "sword".into(),
                    level: 1
                },
                ProgressionEvent::SkillLeveledUp {
                    skill_id: "sword".into(),
                    level: 2
                },
            ]
        );
    }

    #[test]
    fn max_level_stops_progress() {
        let mut book = SkillBook::new(&definitions()).unwrap();
        assert_eq!(book.add_experience("sword", 10_000.0, &mut Vec::new()), 3);
        assert!(book.skill("sword").unwrap().is_maxed());
        assert_eq!(book.skill("sword").unwrap().experience(), 0.0);
        assert_eq!(book.add_experience("sword", 500.0, &mut Vec::new()), 0);
    }

    #[test]
    fn unknown_skill_and_bad_amounts_are_ignored() {
        let mut book = SkillBook::new(&definitions()).unwrap();
        let mut events = Vec::new();
        assert_eq!(book.add_experience("archery", 500.0, &mut events), 0);
        assert_eq!(book.add_experience("sword", -5.0, &mut events), 0);
        assert_eq!(book.add_experience("sword", f32::NAN, &mut events), 0);
        assert!(events.is_empty());
        assert_eq!(book.level("archery"), 0);
    }

    #[test]
    fn unlocks_follow_level() {
        let mut book = SkillBook::new(&definitions()).unwrap();
        assert!(book.is_unlocked("recipes"));
        assert!(!book.is_unlocked("parry"));

        book.add_experience("sword", 300.0, &mut Vec::new());
        assert_eq!(
            book.unlocked_features().into_iter().collect::<Vec<_>>(),
            vec!["parry", "recipes"]
        );
    }

    #[test]
    fn restore_applies_progress_and_skips_removed_skills() {
        let defs = definitions();
        let mut book = SkillBook::new(&defs).unwrap();
        book.add_experience("sword", 130.0, &mut Vec::new());

        let mut snapshots = book.snapshot();
        snapshots.push(SkillSnapshot {
            id: "retired".into(),
            level: 4,
            experience: 1.0,
            next_level_threshold: 10.0,
        });

        let restored = SkillBook::restore(&defs, snapshots).unwrap();
        assert_eq!(restored, book);
        assert!(restored.skill("retired").is_none());
    }

    #[test]
    fn restore_rejects_invalid_progress() {
        let defs = definitions();
        let snapshots = vec![SkillSnapshot {
            id: "sword".into(),
            level: 9,
            experience: 0.0,
            next_level_threshold: 100.0,
        }];
        assert_eq!(
            SkillBook::restore(&defs, snapshots).unwrap_err(),
            SnapshotError::InvalidSkillProgress("sword".into())
        );
    }
}
