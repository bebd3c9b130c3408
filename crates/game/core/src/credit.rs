//! Social-credit score and reputation tiers.

use tracing::{debug, warn};

use crate::error::DefinitionError;
use crate::events::{EventSink, ProgressionEvent};
use crate::snapshot::SnapshotError;

/// Named band of the credit score.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreditTier {
    pub id: String,
    pub label: String,
    /// Lowest score that still belongs to this tier.
    pub min_score: f32,
}

impl CreditTier {
    pub fn new(id: impl Into<String>, label: impl Into<String>, min_score: f32) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            min_score,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CreditConfig {
    pub starting_score: f32,
    pub min_score: f32,
    pub max_score: f32,
    pub tiers: Vec<CreditTier>,
}

impl Default for CreditConfig {
    fn default() -> Self {
        Self {
            starting_score: 50.0,
            min_score: 0.0,
            max_score: 100.0,
            tiers: vec![
                CreditTier::new("untrusted", "Untrusted", 0.0),
                CreditTier::new("citizen", "Citizen", 30.0),
                CreditTier::new("trusted", "Trusted", 70.0),
            ],
        }
    }
}

/// Result of an adjustment that crossed a tier boundary.
#[derive(Clone, Debug, PartialEq)]
pub struct TierChange {
    pub from: String,
    pub to: String,
    pub score: f32,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreditSnapshot {
    pub score: f32,
    pub tier: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CreditLedger {
    score: f32,
    min_score: f32,
    max_score: f32,
    /// Sorted ascending by `min_score`, never empty.
    tiers: Vec<CreditTier>,
}

impl CreditLedger {
    pub fn new(config: &CreditConfig) -> Result<Self, DefinitionError> {
        let CreditConfig {
            starting_score,
            min_score,
            max_score,
            tiers,
        } = config;
        if !(min_score.is_finite() && max_score.is_finite()) || min_score > max_score {
            return Err(DefinitionError::InvertedCreditBounds {
                min: *min_score,
                max: *max_score,
            });
        }
        if tiers.is_empty() {
            return Err(DefinitionError::NoCreditTiers);
        }

        let mut tiers = tiers.clone();
        tiers.sort_by(|a, b| a.min_score.total_cmp(&b.min_score));

        let start = if starting_score.is_finite() {
            *starting_score
        } else {
            *min_score
        };
        Ok(Self {
            score: start.clamp(*min_score, *max_score),
            min_score: *min_score,
            max_score: *max_score,
            tiers,
        })
    }

    pub fn score(&self) -> f32 {
        self.score
    }

    /// Highest tier whose threshold the score reaches; the lowest tier when
    /// the score sits below every threshold.
    pub fn tier(&self) -> &CreditTier {
        Self::tier_for(&self.tiers, self.score)
    }

    pub fn tiers(&self) -> &[CreditTier] {
        &self.tiers
    }

    fn tier_for(tiers: &[CreditTier], score: f32) -> &CreditTier {
        tiers
            .iter()
            .rev()
            .find(|tier| tier.min_score <= score)
            .unwrap_or(&tiers[0])
    }

    /// Move the score by `delta`, clamped into bounds.
    ///
    /// Publishes [`ProgressionEvent::CreditTierChanged`] and returns the
    /// change when the adjustment lands in a different tier.
    pub fn adjust(&mut self, delta: f32, sink: &mut dyn EventSink) -> Option<TierChange> {
        if !delta.is_finite() {
            warn!(target: "progression::credit", delta, "ignoring non-finite credit delta");
            return None;
        }

        let before = self.tier().id.clone();
        self.score = (self.score + delta).clamp(self.min_score, self.max_score);
        let after = &self.tier().id;
        if *after == before {
            return None;
        }

        let change = TierChange {
            from: before,
            to: after.clone(),
            score: self.score,
        };
        debug!(
            target: "progression::credit",
            from = %change.from,
            to = %change.to,
            score = change.score,
            "credit tier changed"
        );
        sink.publish(ProgressionEvent::CreditTierChanged {
            from: change.from.clone(),
            to: change.to.clone(),
            score: change.score,
        });
        Some(change)
    }

    pub fn snapshot(&self) -> CreditSnapshot {
        CreditSnapshot {
            score: self.score,
            tier: self.tier().id.clone(),
        }
    }

    /// Restore the persisted score under the current tier configuration.
    ///
    /// The stored tier id is informational; the tier is re-derived from the
    /// score so retuned thresholds take effect.
    pub fn restore(config: &CreditConfig, snapshot: &CreditSnapshot) -> Result<Self, SnapshotError> {
        if !snapshot.score.is_finite() {
            return Err(SnapshotError::NonFiniteCredit(snapshot.score));
        }
        let mut ledger = Self::new(config)?;
        ledger.score = snapshot.score.clamp(ledger.min_score, ledger.max_score);
        Ok(ledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_tier_comes_from_starting_score() {
        let ledger = CreditLedger::new(&CreditConfig::default()).unwrap();
        assert_eq!(ledger.score(), 50.0);
        assert_eq!(ledger.tier().id, "citizen");
    }

    #[test]
    fn unsorted_tiers_are_ordered_on_load() {
        let config = CreditConfig {
            tiers: vec![
                CreditTier::new("trusted", "Trusted", 70.0),
                CreditTier::new("untrusted", "Untrusted", 0.0),
            ],
            ..CreditConfig::default()
        };
        let ledger = CreditLedger::new(&config).unwrap();
        assert_eq!(ledger.tiers()[0].id, "untrusted");
        assert_eq!(ledger.tier().id, "untrusted");
    }

    #[test]
    fn crossing_a_threshold_publishes_once() {
        let mut ledger = CreditLedger::new(&CreditConfig::default()).unwrap();
        let mut events = Vec::new();

        assert_eq!(ledger.adjust(10.0, &mut events), None);
        let change = ledger.adjust(15.0, &mut events).unwrap();
        assert_eq!(change.from, "citizen");
        assert_eq!(change.to, "trusted");
        assert_eq!(
            events,
            vec![ProgressionEvent::CreditTierChanged {
                from: "citizen".into(),
                to: "trusted".into(),
                score: 75.0,
            }]
        );
    }

    #[test]
    fn score_is_clamped() {
        let mut ledger = CreditLedger::new(&CreditConfig::default()).unwrap();
        ledger.adjust(-500.0, &mut Vec::new());
        assert_eq!(ledger.score(), 0.0);
        ledger.adjust(1_000.0, &mut Vec::new());
        assert_eq!(ledger.score(), 100.0);
    }

    #[test]
    fn invalid_configs_fail() {
        let empty = CreditConfig {
            tiers: Vec::new(),
            ..CreditConfig::default()
        };
        assert_eq!(CreditLedger::new(&empty).unwrap_err(), DefinitionError::NoCreditTiers);

        let inverted = CreditConfig {
            min_score: 10.0,
            max_score: -10.0,
            ..CreditConfig::default()
        };
        assert!(matches!(
            CreditLedger::new(&inverted),
            Err(DefinitionError::InvertedCreditBounds { .. })
        ));
    }

    #[test]
    fn restore_rederives_tier_from_score() {
        let config = CreditConfig::default();
        let snapshot = CreditSnapshot {
            score: 80.0,
            tier: "stale".into(),
        };
        let ledger = CreditLedger::restore(&config, &snapshot).unwrap();
        assert_eq!(ledger.tier().id, "trusted");
    }
}
