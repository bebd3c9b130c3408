//! Timed and permanent adjustments to a stat's effective value.

/// How a modifier participates in recomputation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ModifierKind {
    /// Summed and added to the base value.
    Additive,
    /// Applied as a `(1 + value)` factor after the additive sum.
    Multiplicative,
    /// Replaces the computed value entirely; the highest override wins.
    Override,
}

/// A single adjustment tagged with the source that produced it.
///
/// Sources are not unique: a potion and a skill may both stack modifiers on the
/// same stat, and all modifiers sharing a source can be purged together.
///
/// A `duration <= 0` marks the modifier as permanent. Temporary modifiers
/// count `remaining_time` down on every tick and are dropped once it reaches
/// zero.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Modifier {
    pub source: String,
    pub value: f32,
    pub kind: ModifierKind,
    /// Total lifetime in seconds (`<= 0` = permanent).
    pub duration: f32,
    /// Seconds left before expiry. Only meaningful when `duration > 0`.
    pub remaining_time: f32,
}

impl Modifier {
    /// Create a modifier with the given lifetime (`<= 0` for permanent).
    pub fn new(source: impl Into<String>, value: f32, kind: ModifierKind, duration: f32) -> Self {
        Self {
            source: source.into(),
            value,
            kind,
            duration,
            remaining_time: duration,
        }
    }

    /// Create a permanent modifier.
    pub fn permanent(source: impl Into<String>, value: f32, kind: ModifierKind) -> Self {
        Self::new(source, value, kind, 0.0)
    }

    /// Create a temporary modifier lasting `duration` seconds.
    pub fn timed(source: impl Into<String>, value: f32, kind: ModifierKind, duration: f32) -> Self {
        Self::new(source, value, kind, duration)
    }

    pub fn is_permanent(&self) -> bool {
        self.duration <= 0.0
    }

    /// True for a temporary modifier whose lifetime has run out.
    pub fn is_expired(&self) -> bool {
        !self.is_permanent() && self.remaining_time <= 0.0
    }

    /// Count the remaining lifetime down. Permanent modifiers are untouched.
    pub(crate) fn elapse(&mut self, delta_seconds: f32) {
        if !self.is_permanent() {
            self.remaining_time -= delta_seconds;
        }
    }

    /// Rejects values that would poison clamping (NaN, infinities).
    pub(crate) fn is_well_formed(&self) -> bool {
        self.value.is_finite() && self.duration.is_finite() && self.remaining_time.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permanent_modifiers_never_expire() {
        let mut modifier = Modifier::permanent("skill_sword", 3.0, ModifierKind::Additive);
        modifier.elapse(1_000.0);
        assert!(modifier.is_permanent());
        assert!(!modifier.is_expired());
        assert_eq!(modifier.remaining_time, 0.0);
    }

    #[test]
    fn timed_modifier_counts_down_to_expiry() {
        let mut modifier = Modifier::timed("potion_effect", 0.5, ModifierKind::Multiplicative, 5.0);
        modifier.elapse(4.0);
        assert!(!modifier.is_expired());
        modifier.elapse(1.0);
        assert!(modifier.is_expired());
    }

    #[test]
    fn kind_parses_from_snake_case() {
        assert_eq!("override".parse::<ModifierKind>().unwrap(), ModifierKind::Override);
        assert_eq!(ModifierKind::Multiplicative.to_string(), "multiplicative");
    }
}
