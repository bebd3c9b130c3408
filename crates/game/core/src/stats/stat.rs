//! A single named stat and its persisted form.

use super::aggregate::effective_value;
use super::modifier::Modifier;
use crate::error::DefinitionError;
use crate::snapshot::SnapshotError;

/// Configured starting point for one stat.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatDefinition {
    pub id: String,
    pub base_value: f32,
    pub min_value: f32,
    pub max_value: f32,
    /// Reserved for growth curves; persisted but not used in recomputation.
    #[cfg_attr(feature = "serde", serde(default))]
    pub growth_rate: f32,
}

impl StatDefinition {
    pub fn new(id: impl Into<String>, base_value: f32, min_value: f32, max_value: f32) -> Self {
        Self {
            id: id.into(),
            base_value,
            min_value,
            max_value,
            growth_rate: 0.0,
        }
    }

    pub fn with_growth_rate(mut self, growth_rate: f32) -> Self {
        self.growth_rate = growth_rate;
        self
    }
}

/// Read-only view returned by value lookups: `(base, current, min, max)`.
///
/// Unknown stats report [`StatValue::default`], all zeros.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatValue {
    pub base: f32,
    pub current: f32,
    pub min: f32,
    pub max: f32,
}

/// A live stat owned by the [`StatEngine`](super::StatEngine).
#[derive(Clone, Debug, PartialEq)]
pub struct Stat {
    id: String,
    base_value: f32,
    min_value: f32,
    max_value: f32,
    growth_rate: f32,
    current_value: f32,
    modifiers: Vec<Modifier>,
}

impl Stat {
    /// Build a stat from its definition with `current = base` (clamped).
    pub fn from_definition(def: &StatDefinition) -> Result<Self, DefinitionError> {
        if !(def.base_value.is_finite() && def.min_value.is_finite() && def.max_value.is_finite())
        {
            return Err(DefinitionError::NonFiniteStat { id: def.id.clone() });
        }
        if def.min_value > def.max_value {
            return Err(DefinitionError::InvertedBounds {
                id: def.id.clone(),
                min: def.min_value,
                max: def.max_value,
            });
        }

        let base_value = def.base_value.clamp(def.min_value, def.max_value);
        Ok(Self {
            id: def.id.clone(),
            base_value,
            min_value: def.min_value,
            max_value: def.max_value,
            growth_rate: def.growth_rate,
            current_value: base_value,
            modifiers: Vec::new(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn base_value(&self) -> f32 {
        self.base_value
    }

    pub fn current_value(&self) -> f32 {
        self.current_value
    }

    pub fn min_value(&self) -> f32 {
        self.min_value
    }

    pub fn max_value(&self) -> f32 {
        self.max_value
    }

    pub fn growth_rate(&self) -> f32 {
        self.growth_rate
    }

    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    pub fn value(&self) -> StatValue {
        StatValue {
            base: self.base_value,
            current: self.current_value,
            min: self.min_value,
            max: self.max_value,
        }
    }

    /// Recompute `current_value` from base and modifiers.
    pub(crate) fn recompute(&mut self) {
        self.current_value =
            effective_value(self.base_value, &self.modifiers, self.min_value, self.max_value);
    }

    pub(crate) fn shift_base(&mut self, delta: f32) {
        self.base_value = (self.base_value + delta).clamp(self.min_value, self.max_value);
    }

    pub(crate) fn push_modifier(&mut self, modifier: Modifier) {
        self.modifiers.push(modifier);
    }

    /// Put `modifier` where the first entry from the same source sat and drop
    /// the other entries from that source. Appends when the source is new.
    pub(crate) fn replace_source(&mut self, modifier: Modifier) {
        match self.modifiers.iter().position(|m| m.source == modifier.source) {
            Some(index) => {
                let mut position = 0;
                self.modifiers.retain(|m| {
                    let keep = position <= index || m.source != modifier.source;
                    position += 1;
                    keep
                });
                self.modifiers[index] = modifier;
            }
            None => self.modifiers.push(modifier),
        }
    }

    /// Remove every modifier tagged with `source`; returns how many were removed.
    pub(crate) fn purge_source(&mut self, source: &str) -> usize {
        let before = self.modifiers.len();
        self.modifiers.retain(|m| m.source != source);
        before - self.modifiers.len()
    }

    /// Count temporary modifiers down and drop the expired ones.
    ///
    /// Returns the number of modifiers removed.
    pub(crate) fn elapse_modifiers(&mut self, delta_seconds: f32) -> usize {
        let before = self.modifiers.len();
        for modifier in &mut self.modifiers {
            modifier.elapse(delta_seconds);
        }
        self.modifiers.retain(|m| !m.is_expired());
        before - self.modifiers.len()
    }

    pub fn snapshot(&self) -> StatSnapshot {
        StatSnapshot {
            id: self.id.clone(),
            base: self.base_value,
            current: self.current_value,
            min: self.min_value,
            max: self.max_value,
            growth_rate: self.growth_rate,
            modifiers: self.modifiers.clone(),
        }
    }

    /// Rebuild a stat exactly as persisted.
    ///
    /// `current` is taken verbatim: it stays authoritative until the next tick
    /// recomputes it.
    pub fn from_snapshot(snapshot: StatSnapshot) -> Result<Self, SnapshotError> {
        let StatSnapshot {
            id,
            base,
            current,
            min,
            max,
            growth_rate,
            modifiers,
        } = snapshot;

        if !(base.is_finite() && current.is_finite() && min.is_finite() && max.is_finite()) {
            return Err(SnapshotError::NonFiniteStat(id));
        }
        if min > max {
            return Err(SnapshotError::InvertedBounds { id, min, max });
        }
        if !(min..=max).contains(&current) {
            return Err(SnapshotError::CurrentOutOfBounds { id, current });
        }
        if modifiers.iter().any(|m| !m.is_well_formed()) {
            return Err(SnapshotError::MalformedModifier(id));
        }

        Ok(Self {
            id,
            base_value: base,
            min_value: min,
            max_value: max,
            growth_rate,
            current_value: current,
            modifiers,
        })
    }
}

/// Persisted form of a [`Stat`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatSnapshot {
    pub id: String,
    pub base: f32,
    pub current: f32,
    pub min: f32,
    pub max: f32,
    pub growth_rate: f32,
    pub modifiers: Vec<Modifier>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::ModifierKind;

    #[test]
    fn definition_base_is_clamped_into_bounds() {
        let stat = Stat::from_definition(&StatDefinition::new("stamina", 140.0, 0.0, 100.0))
            .expect("valid definition");
        assert_eq!(stat.base_value(), 100.0);
        assert_eq!(stat.current_value(), 100.0);
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let err = Stat::from_definition(&StatDefinition::new("luck", 5.0, 10.0, 0.0)).unwrap_err();
        assert!(matches!(err, DefinitionError::InvertedBounds { .. }));
    }

    #[test]
    fn snapshot_restores_current_verbatim() {
        let mut stat =
            Stat::from_definition(&StatDefinition::new("charm", 10.0, 0.0, 100.0)).unwrap();
        stat.push_modifier(Modifier::permanent("outfit", 4.0, ModifierKind::Additive));
        stat.recompute();

        let mut snapshot = stat.snapshot();
        snapshot.current = 42.0;
        let restored = Stat::from_snapshot(snapshot).unwrap();
        assert_eq!(restored.current_value(), 42.0);
        assert_eq!(restored.modifiers().len(), 1);
    }

    #[test]
    fn snapshot_with_current_outside_bounds_is_rejected() {
        let stat = Stat::from_definition(&StatDefinition::new("charm", 10.0, 0.0, 100.0)).unwrap();
        let mut snapshot = stat.snapshot();
        snapshot.current = 101.0;
        assert!(matches!(
            Stat::from_snapshot(snapshot),
            Err(SnapshotError::CurrentOutOfBounds { .. })
        ));
    }
}
