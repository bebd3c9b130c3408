//! Modifier aggregation following the fixed calculation order:
//! Additive → Multiplicative → Override → Clamp
//!
//! Additive values are summed and multiplicative factors multiplied, so both
//! are order-independent up to floating-point rounding. Factors are folded in
//! list order to keep the product bit-for-bit reproducible.

use super::modifier::{Modifier, ModifierKind};

/// Folded totals of a modifier list, ready to be applied to a base value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModifierTotals {
    /// Sum of all additive values.
    pub additive: f32,
    /// Product of `(1 + value)` across multiplicative modifiers.
    pub factor: f32,
    /// Highest override value, if any override is present.
    pub override_value: Option<f32>,
}

impl Default for ModifierTotals {
    fn default() -> Self {
        Self {
            additive: 0.0,
            factor: 1.0,
            override_value: None,
        }
    }
}

impl ModifierTotals {
    /// Fold a modifier list into totals.
    pub fn from_modifiers(modifiers: &[Modifier]) -> Self {
        let additive: f32 = modifiers
            .iter()
            .filter_map(|m| match m.kind {
                ModifierKind::Additive => Some(m.value),
                _ => None,
            })
            .sum();

        let factor = modifiers
            .iter()
            .filter_map(|m| match m.kind {
                ModifierKind::Multiplicative => Some(m.value),
                _ => None,
            })
            .fold(1.0_f32, |acc, value| acc * (1.0 + value));

        // Equal maxima keep the first one seen.
        let override_value = modifiers
            .iter()
            .filter_map(|m| match m.kind {
                ModifierKind::Override => Some(m.value),
                _ => None,
            })
            .fold(None, |best: Option<f32>, value| match best {
                Some(current) if value <= current => Some(current),
                _ => Some(value),
            });

        Self {
            additive,
            factor,
            override_value,
        }
    }

    /// Apply the totals to a base value and clamp into `[min, max]`.
    ///
    /// # Formula
    /// ```text
    /// override present: clamp(O, min, max)
    /// otherwise:        clamp((base + A) × M, min, max)
    /// ```
    ///
    /// No floor is applied below `min`: several negative multiplicative
    /// modifiers may push the product negative and only the stat's own bounds
    /// stop it.
    pub fn apply(&self, base: f32, min: f32, max: f32) -> f32 {
        let raw = match self.override_value {
            Some(value) => value,
            None => (base + self.additive) * self.factor,
        };
        clamp_finite(raw, min, max)
    }
}

/// Compute the effective value of a stat in one call.
pub fn effective_value(base: f32, modifiers: &[Modifier], min: f32, max: f32) -> f32 {
    ModifierTotals::from_modifiers(modifiers).apply(base, min, max)
}

/// Clamp that maps NaN (e.g. `inf × 0`) onto the lower bound.
fn clamp_finite(value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(value: f32) -> Modifier {
        Modifier::permanent("test", value, ModifierKind::Additive)
    }

    fn mul(value: f32) -> Modifier {
        Modifier::permanent("test", value, ModifierKind::Multiplicative)
    }

    fn over(value: f32) -> Modifier {
        Modifier::permanent("test", value, ModifierKind::Override)
    }

    #[test]
    fn additive_modifiers_sum() {
        let value = effective_value(10.0, &[add(5.0), add(3.0)], 0.0, 100.0);
        assert_eq!(value, 18.0);
    }

    #[test]
    fn additive_applies_inside_multiplicative() {
        // (10 + 2) × 1.5
        let value = effective_value(10.0, &[mul(0.5), add(2.0)], 0.0, 100.0);
        assert_eq!(value, 18.0);
    }

    #[test]
    fn multiplicative_factors_compound() {
        // 10 × 1.5 × 2.0
        let value = effective_value(10.0, &[mul(0.5), mul(1.0)], 0.0, 100.0);
        assert_eq!(value, 30.0);
    }

    #[test]
    fn override_ignores_other_kinds() {
        let modifiers = [add(50.0), mul(3.0), over(12.0)];
        assert_eq!(effective_value(10.0, &modifiers, 0.0, 100.0), 12.0);
    }

    #[test]
    fn highest_override_wins() {
        let modifiers = [over(12.0), over(40.0), over(7.0)];
        assert_eq!(effective_value(10.0, &modifiers, 0.0, 100.0), 40.0);
    }

    #[test]
    fn override_is_clamped() {
        assert_eq!(effective_value(10.0, &[over(500.0)], 0.0, 100.0), 100.0);
    }

    #[test]
    fn minus_one_hundred_percent_zeroes_the_stat() {
        assert_eq!(effective_value(40.0, &[mul(-1.0)], -10.0, 100.0), 0.0);
    }

    #[test]
    fn negative_product_is_only_floored_by_min() {
        // 10 × (1 - 2) × (1 + 0.5) = -15
        let value = effective_value(10.0, &[mul(-2.0), mul(0.5)], -100.0, 100.0);
        assert_eq!(value, -15.0);
        assert_eq!(effective_value(10.0, &[mul(-2.0)], 0.0, 100.0), 0.0);
    }

    #[test]
    fn empty_list_returns_clamped_base() {
        assert_eq!(effective_value(150.0, &[], 0.0, 100.0), 100.0);
        let totals = ModifierTotals::from_modifiers(&[]);
        assert_eq!(totals, ModifierTotals::default());
    }
}
