//! Per-player progression facade.
//!
//! [`ProgressionEngine`] owns the stat engine, the scheduler, the skill book
//! and the credit ledger of one player and wires the cross-system rules
//! between them. It is a plain value: hosts construct it, drive it with
//! explicit deltas and persist it through [`ProgressionSnapshot`].

use crate::config::ProgressionConfig;
use crate::credit::{CreditLedger, TierChange};
use crate::env::DefinitionOracle;
use crate::error::DefinitionError;
use crate::events::EventSink;
use crate::skills::{SkillBook, propagate};
use crate::snapshot::{ProgressionSnapshot, SnapshotError};
use crate::stats::{Modifier, StatEngine, StatValue};
use crate::time::{AllocationError, ScheduleState, TimeScheduler};

#[derive(Clone, Debug, PartialEq)]
pub struct ProgressionEngine {
    stats: StatEngine,
    time: TimeScheduler,
    skills: SkillBook,
    credit: CreditLedger,
    config: ProgressionConfig,
}

impl ProgressionEngine {
    /// Build a fresh engine from content.
    pub fn from_definitions(
        player_id: impl Into<String>,
        oracle: &dyn DefinitionOracle,
    ) -> Result<Self, DefinitionError> {
        Ok(Self {
            stats: StatEngine::new(player_id, oracle.stat_definitions())?,
            time: TimeScheduler::new(oracle.time_config())?,
            skills: SkillBook::new(oracle.skill_definitions())?,
            credit: CreditLedger::new(oracle.credit_config())?,
            config: oracle.progression_config(),
        })
    }

    pub fn player_id(&self) -> &str {
        self.stats.player_id()
    }

    pub fn stats(&self) -> &StatEngine {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut StatEngine {
        &mut self.stats
    }

    pub fn schedule(&self) -> &TimeScheduler {
        &self.time
    }

    pub fn skills(&self) -> &SkillBook {
        &self.skills
    }

    pub fn credit(&self) -> &CreditLedger {
        &self.credit
    }

    pub fn config(&self) -> &ProgressionConfig {
        &self.config
    }

    /// One simulation step: refresh skill boosts, then expire modifiers and
    /// recompute every stat.
    pub fn tick(&mut self, delta_seconds: f32) {
        propagate(&self.skills, &mut self.stats, &self.config);
        self.stats.tick(delta_seconds);
    }

    /// Advance the calendar. Returns the number of day boundaries crossed.
    pub fn advance_time(&mut self, hours: f32, sink: &mut dyn EventSink) -> u32 {
        self.time.advance(hours, sink)
    }

    /// Grant skill experience. Stat boosts follow on the next [`tick`](Self::tick).
    pub fn add_experience(&mut self, skill_id: &str, amount: f32, sink: &mut dyn EventSink) -> u32 {
        self.skills.add_experience(skill_id, amount, sink)
    }

    pub fn adjust_credit(&mut self, delta: f32, sink: &mut dyn EventSink) -> Option<TierChange> {
        self.credit.adjust(delta, sink)
    }

    // ===== stat passthroughs =====

    pub fn stat_value(&self, stat_id: &str) -> StatValue {
        self.stats.value(stat_id)
    }

    pub fn apply_base_delta(&mut self, stat_id: &str, delta: f32) {
        self.stats.apply_base_delta(stat_id, delta);
    }

    pub fn apply_modifier(&mut self, stat_id: &str, modifier: Modifier) {
        self.stats.apply_modifier(stat_id, modifier);
    }

    pub fn remove_modifiers_by_source(&mut self, stat_id: &str, source: &str) {
        self.stats.remove_modifiers_by_source(stat_id, source);
    }

    // ===== schedule passthroughs =====

    pub fn allocate(&mut self, block_id: u32, activity_id: &str) -> Result<(), AllocationError> {
        self.time.allocate(block_id, activity_id)
    }

    pub fn release(&mut self, block_id: u32) -> bool {
        self.time.release(block_id)
    }

    pub fn has_time_for(&self, activity_id: &str) -> bool {
        self.time.has_time_for(activity_id)
    }

    pub fn schedule_state(&self) -> ScheduleState {
        self.time.state()
    }

    /// Free every block and clear its activity.
    pub fn reset_blocks(&mut self) {
        self.time.reset_blocks();
    }

    pub fn snapshot(&self) -> ProgressionSnapshot {
        ProgressionSnapshot {
            stats: self.stats.snapshot(),
            time: self.time.snapshot(),
            skills: self.skills.snapshot(),
            credit: self.credit.snapshot(),
        }
    }

    /// Rebuild an engine from persisted state.
    ///
    /// Mutable fields come from the snapshot verbatim; anything that is pure
    /// configuration (activity costs, skill effects, credit tiers) comes from
    /// `oracle`. Nothing is recomputed.
    pub fn restore(
        snapshot: ProgressionSnapshot,
        oracle: &dyn DefinitionOracle,
    ) -> Result<Self, SnapshotError> {
        let ProgressionSnapshot {
            stats,
            time,
            skills,
            credit,
        } = snapshot;

        Ok(Self {
            stats: StatEngine::restore(stats)?,
            time: TimeScheduler::restore(time, oracle.time_config())?,
            skills: SkillBook::restore(oracle.skill_definitions(), skills)?,
            credit: CreditLedger::restore(oracle.credit_config(), &credit)?,
            config: oracle.progression_config(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::credit::CreditConfig;
    use crate::env::DefinitionSnapshot;
    use crate::events::{NullSink, ProgressionEvent};
    use crate::skills::{SkillDefinition, SkillEffect};
    use crate::stats::{ModifierKind, StatDefinition};
    use crate::time::{TimeBlockTemplate, TimeConfig};

    fn content() -> DefinitionSnapshot {
        DefinitionSnapshot::new(
            vec![
                StatDefinition::new("strength", 10.0, 0.0, 100.0),
                StatDefinition::new("health", 100.0, 0.0, 100.0),
            ],
            TimeConfig {
                start_hour: 8.0,
                blocks: vec![
                    TimeBlockTemplate::new(1, "morning", 8, 12),
                    TimeBlockTemplate::new(2, "afternoon", 12, 18),
                ],
                activity_costs: BTreeMap::from([("study".to_string(), 4.0)]),
                ..TimeConfig::default()
            },
            vec![
                SkillDefinition::new("sword", "Sword")
                    .with_threshold(100.0, 1.0)
                    .with_effect(SkillEffect::StatBoost {
                        stat: "strength".into(),
                        value_per_level: 2.0,
                    }),
            ],
            CreditConfig::default(),
        )
    }

    #[test]
    fn tick_applies_skill_boosts_without_stacking() {
        let mut engine = ProgressionEngine::from_definitions("p1", &content()).unwrap();
        engine.add_experience("sword", 200.0, &mut NullSink);

        engine.tick(0.5);
        engine.tick(0.5);
        assert_eq!(engine.stat_value("strength").current, 14.0);
        assert_eq!(engine.stats().stat("strength").unwrap().modifiers().len(), 1);
    }

    #[test]
    fn reset_blocks_frees_the_schedule_without_a_rollover() {
        let mut engine = ProgressionEngine::from_definitions("p1", &content()).unwrap();
        engine.allocate(1, "study").unwrap();
        engine.allocate(2, "study").unwrap();
        assert!(engine.schedule_state().available_blocks.is_empty());

        engine.reset_blocks();
        assert_eq!(engine.schedule_state().available_blocks.len(), 2);
        assert_eq!(engine.schedule().clock().day, 1);
    }

    #[test]
    fn invalid_content_fails_construction() {
        let mut bad = content();
        bad.stats.push(StatDefinition::new("broken", 0.0, 5.0, 1.0));
        assert!(matches!(
            ProgressionEngine::from_definitions("p1", &bad),
            Err(DefinitionError::InvertedBounds { .. })
        ));
    }

    #[test]
    fn advance_time_publishes_through_sink() {
        let mut engine = ProgressionEngine::from_definitions("p1", &content()).unwrap();
        let mut events = Vec::new();
        engine.advance_time(17.0, &mut events);
        assert!(events.contains(&ProgressionEvent::DayChanged {
            day: 2,
            day_of_week: crate::time::DayOfWeek::Tuesday
        }));
    }

    #[test]
    fn snapshot_restore_round_trip_is_stable() {
        let defs = content();
        let mut engine = ProgressionEngine::from_definitions("p1", &defs).unwrap();
        engine.add_experience("sword", 150.0, &mut NullSink);
        engine.apply_modifier(
            "health",
            Modifier::timed("poison", -20.0, ModifierKind::Additive, 30.0),
        );
        engine.tick(10.0);
        engine.allocate(2, "study").unwrap();
        engine.adjust_credit(-25.0, &mut NullSink);
        engine.advance_time(1.5, &mut NullSink);

        let snapshot = engine.snapshot();
        let mut restored = ProgressionEngine::restore(snapshot.clone(), &defs).unwrap();
        assert_eq!(restored.snapshot(), snapshot);
        assert_eq!(restored, engine);

        restored.tick(0.0);
        assert_eq!(restored.snapshot(), snapshot);
    }

    #[test]
    fn refreshing_skill_boosts_keeps_modifier_order() {
        let mut defs = content();
        defs.stats.push(StatDefinition::new("wealth", 0.0, -1e9, 1e9));
        defs.skills.push(
            SkillDefinition::new("trading", "Trading")
                .with_threshold(100.0, 1.0)
                .with_effect(SkillEffect::StatBoost {
                    stat: "wealth".into(),
                    value_per_level: 0.1,
                }),
        );
        let mut engine = ProgressionEngine::from_definitions("p1", &defs).unwrap();
        engine.add_experience("trading", 100.0, &mut NullSink);
        engine.tick(0.0);
        engine.apply_modifier("wealth", Modifier::permanent("loan", 1e8, ModifierKind::Additive));
        engine.apply_modifier(
            "wealth",
            Modifier::permanent("repayment", -1e8, ModifierKind::Additive),
        );
        let before = engine.stat_value("wealth").current;

        let snapshot = engine.snapshot();
        let mut restored = ProgressionEngine::restore(snapshot.clone(), &defs).unwrap();
        restored.tick(0.0);

        assert_eq!(restored.stat_value("wealth").current, before);
        let sources: Vec<&str> = restored
            .stats()
            .stat("wealth")
            .unwrap()
            .modifiers()
            .iter()
            .map(|m| m.source.as_str())
            .collect();
        assert_eq!(sources, vec!["skill_trading", "loan", "repayment"]);
        assert_eq!(restored.snapshot(), snapshot);
    }
}
