//! Persisted engine state.
//!
//! A [`ProgressionSnapshot`] carries every mutable field of the engine and
//! nothing derived from configuration. Restoring repopulates the fields
//! verbatim: `current` stat values in particular are trusted until the next
//! tick recomputes them.

use crate::credit::CreditSnapshot;
use crate::error::{DefinitionError, ErrorSeverity, GameError};
use crate::skills::SkillSnapshot;
use crate::stats::StatsSnapshot;
use crate::time::TimeSnapshot;

/// Complete persisted state of one player's progression.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgressionSnapshot {
    pub stats: StatsSnapshot,
    pub time: TimeSnapshot,
    pub skills: Vec<SkillSnapshot>,
    pub credit: CreditSnapshot,
}

impl ProgressionSnapshot {
    pub fn player_id(&self) -> &str {
        &self.stats.player_id
    }
}

/// Structural problems found while restoring a snapshot.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SnapshotError {
    #[error("stat '{0}' contains a non-finite value")]
    NonFiniteStat(String),

    #[error("stat '{id}' has inverted bounds (min {min} > max {max})")]
    InvertedBounds { id: String, min: f32, max: f32 },

    #[error("stat '{id}' current value {current} lies outside its bounds")]
    CurrentOutOfBounds { id: String, current: f32 },

    #[error("stat '{0}' carries a modifier with non-finite fields")]
    MalformedModifier(String),

    #[error("stat '{0}' appears more than once")]
    DuplicateStat(String),

    #[error("clock is out of range: {0}")]
    InvalidClock(&'static str),

    #[error("time block {0} has invalid hours or allocation state")]
    InvalidBlock(u32),

    #[error("time block {0} appears more than once")]
    DuplicateBlock(u32),

    #[error("skill '{0}' has invalid progress values")]
    InvalidSkillProgress(String),

    #[error("credit score {0} is not finite")]
    NonFiniteCredit(f32),

    /// Content consulted during restore is itself invalid.
    #[error(transparent)]
    Definition(#[from] DefinitionError),
}

impl GameError for SnapshotError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        use SnapshotError::*;
        match self {
            NonFiniteStat(_) => "SNAPSHOT_NON_FINITE_STAT",
            InvertedBounds { .. } => "SNAPSHOT_INVERTED_BOUNDS",
            CurrentOutOfBounds { .. } => "SNAPSHOT_CURRENT_OUT_OF_BOUNDS",
            MalformedModifier(_) => "SNAPSHOT_MALFORMED_MODIFIER",
            DuplicateStat(_) => "SNAPSHOT_DUPLICATE_STAT",
            InvalidClock(_) => "SNAPSHOT_INVALID_CLOCK",
            InvalidBlock(_) => "SNAPSHOT_INVALID_BLOCK",
            DuplicateBlock(_) => "SNAPSHOT_DUPLICATE_BLOCK",
            InvalidSkillProgress(_) => "SNAPSHOT_INVALID_SKILL_PROGRESS",
            NonFiniteCredit(_) => "SNAPSHOT_NON_FINITE_CREDIT",
            Definition(err) => err.error_code(),
        }
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::credit::CreditConfig;
    use crate::engine::ProgressionEngine;
    use crate::env::DefinitionSnapshot;
    use crate::events::NullSink;
    use crate::stats::{Modifier, ModifierKind, StatDefinition};
    use crate::time::{TimeBlockTemplate, TimeConfig};

    fn engine() -> (ProgressionEngine, DefinitionSnapshot) {
        let defs = DefinitionSnapshot::new(
            vec![StatDefinition::new("stamina", 40.0, 0.0, 80.0).with_growth_rate(0.25)],
            TimeConfig {
                blocks: vec![TimeBlockTemplate::new(1, "morning", 6, 12)],
                activity_costs: BTreeMap::from([("jog".to_string(), 1.0)]),
                ..TimeConfig::default()
            },
            Vec::new(),
            CreditConfig::default(),
        );
        let mut engine = ProgressionEngine::from_definitions("p1", &defs).unwrap();
        engine.apply_modifier(
            "stamina",
            Modifier::timed("coffee", 0.5, ModifierKind::Multiplicative, 60.0),
        );
        engine.allocate(1, "jog").unwrap();
        engine.advance_time(3.0, &mut NullSink);
        (engine, defs)
    }

    #[test]
    fn bincode_round_trip_preserves_every_field() {
        let (engine, defs) = engine();
        let snapshot = engine.snapshot();

        let bytes = bincode::serialize(&snapshot).unwrap();
        let decoded: ProgressionSnapshot = bincode::deserialize(&bytes).unwrap();
        assert_eq!(decoded, snapshot);

        let restored = ProgressionEngine::restore(decoded, &defs).unwrap();
        assert_eq!(restored.snapshot(), snapshot);
    }

    #[test]
    fn json_snapshot_carries_current_value_verbatim() {
        let (engine, defs) = engine();
        let mut json = serde_json::to_value(engine.snapshot()).unwrap();
        json["stats"]["stats"][0]["current"] = serde_json::json!(42.0);

        let snapshot: ProgressionSnapshot = serde_json::from_value(json).unwrap();
        let restored = ProgressionEngine::restore(snapshot, &defs).unwrap();
        assert_eq!(restored.stat_value("stamina").current, 42.0);
    }
}
