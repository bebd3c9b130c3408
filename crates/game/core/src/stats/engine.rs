//! Per-player stat store with modifier lifecycle management.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::modifier::Modifier;
use super::stat::{Stat, StatDefinition, StatSnapshot, StatValue};
use crate::error::DefinitionError;
use crate::snapshot::SnapshotError;

/// Owns every stat of one player.
///
/// Stats are kept in a `BTreeMap` so iteration (ticking, snapshots) always
/// happens in id order.
#[derive(Clone, Debug, PartialEq)]
pub struct StatEngine {
    player_id: String,
    stats: BTreeMap<String, Stat>,
}

impl StatEngine {
    /// Create one stat per definition with `current = base`.
    pub fn new(
        player_id: impl Into<String>,
        definitions: &[StatDefinition],
    ) -> Result<Self, DefinitionError> {
        let mut stats = BTreeMap::new();
        for def in definitions {
            let stat = Stat::from_definition(def)?;
            if stats.insert(def.id.clone(), stat).is_some() {
                return Err(DefinitionError::DuplicateStat(def.id.clone()));
            }
        }

        Ok(Self {
            player_id: player_id.into(),
            stats,
        })
    }

    pub fn player_id(&self) -> &str {
        &self.player_id
    }

    pub fn stat(&self, stat_id: &str) -> Option<&Stat> {
        self.stats.get(stat_id)
    }

    pub fn stats(&self) -> impl Iterator<Item = &Stat> {
        self.stats.values()
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// Advance modifier lifetimes by `delta_seconds` and recompute every stat.
    ///
    /// Negative and non-finite deltas are treated as zero so time never runs
    /// backwards.
    pub fn tick(&mut self, delta_seconds: f32) {
        let delta = if delta_seconds.is_finite() {
            delta_seconds.max(0.0)
        } else {
            0.0
        };

        for stat in self.stats.values_mut() {
            let expired = stat.elapse_modifiers(delta);
            if expired > 0 {
                debug!(
                    target: "progression::stats",
                    stat = stat.id(),
                    expired,
                    "modifiers expired"
                );
            }
            stat.recompute();
        }
    }

    /// Shift the base value by `delta`, clamped into the stat's bounds.
    pub fn apply_base_delta(&mut self, stat_id: &str, delta: f32) {
        if !delta.is_finite() {
            warn!(target: "progression::stats", stat = stat_id, "ignoring non-finite base delta");
            return;
        }
        if let Some(stat) = self.stats.get_mut(stat_id) {
            stat.shift_base(delta);
            stat.recompute();
        }
    }

    /// Append a modifier and recompute.
    pub fn apply_modifier(&mut self, stat_id: &str, modifier: Modifier) {
        if !modifier.is_well_formed() {
            warn!(
                target: "progression::stats",
                stat = stat_id,
                source = %modifier.source,
                "ignoring modifier with non-finite fields"
            );
            return;
        }
        if let Some(stat) = self.stats.get_mut(stat_id) {
            stat.push_modifier(modifier);
            stat.recompute();
        }
    }

    /// Remove every modifier from `source` on the stat and recompute.
    ///
    /// Calling this repeatedly is harmless.
    pub fn remove_modifiers_by_source(&mut self, stat_id: &str, source: &str) {
        if let Some(stat) = self.stats.get_mut(stat_id) {
            stat.purge_source(source);
            stat.recompute();
        }
    }

    /// Swap `modifier` in for every existing modifier from the same source,
    /// with a single recomputation.
    ///
    /// The replacement keeps the list position of the first entry it
    /// replaces, so refreshing a recurring effect (skills) never reorders
    /// the modifier list. A new source is appended.
    pub fn replace_source_modifier(&mut self, stat_id: &str, modifier: Modifier) {
        if !modifier.is_well_formed() {
            warn!(
                target: "progression::stats",
                stat = stat_id,
                source = %modifier.source,
                "ignoring modifier with non-finite fields"
            );
            return;
        }
        if let Some(stat) = self.stats.get_mut(stat_id) {
            stat.replace_source(modifier);
            stat.recompute();
        }
    }

    /// Look up `(base, current, min, max)`; zeros when the stat is unknown.
    pub fn value(&self, stat_id: &str) -> StatValue {
        self.stats
            .get(stat_id)
            .map(Stat::value)
            .unwrap_or_default()
    }

    /// Effective value shortcut; `0.0` when the stat is unknown.
    pub fn current(&self, stat_id: &str) -> f32 {
        self.value(stat_id).current
    }

    /// Drop every stat (full reset).
    pub fn clear(&mut self) {
        self.stats.clear();
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            player_id: self.player_id.clone(),
            stats: self.stats.values().map(Stat::snapshot).collect(),
        }
    }

    /// Rebuild the engine from a snapshot without recomputing any value.
    pub fn restore(snapshot: StatsSnapshot) -> Result<Self, SnapshotError> {
        let mut stats = BTreeMap::new();
        for stat_snapshot in snapshot.stats {
            let id = stat_snapshot.id.clone();
            let stat = Stat::from_snapshot(stat_snapshot)?;
            if stats.insert(id.clone(), stat).is_some() {
                return Err(SnapshotError::DuplicateStat(id));
            }
        }

        Ok(Self {
            player_id: snapshot.player_id,
            stats,
        })
    }
}

/// Persisted form of a [`StatEngine`], stats in id order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatsSnapshot {
    pub player_id: String,
    pub stats: Vec<StatSnapshot>,
}
