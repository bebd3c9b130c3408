//! Stat aggregation engine.
//!
//! Every player owns a set of named numeric stats. A stat carries a base value,
//! clamp bounds and an ordered list of [`Modifier`]s; the effective value is
//! recomputed from the modifiers whenever they change or a tick elapses.
//!
//! # Calculation Order
//!
//! ```text
//! [ base ] → + Additive (summed) → × Multiplicative (Π (1 + v)) → Clamp
//!                         ⤷ any Override replaces the whole chain, then Clamp
//! ```
//!
//! ## Principles
//!
//! 1. **Bounded**: `min <= current <= max` after every recomputation
//! 2. **Deterministic**: expiry is driven only by the deltas passed to `tick`
//! 3. **Forgiving lookups**: unknown stat ids are silent no-ops

pub mod aggregate;
pub mod engine;
pub mod modifier;
pub mod stat;

pub use aggregate::ModifierTotals;
pub use engine::{StatEngine, StatsSnapshot};
pub use modifier::{Modifier, ModifierKind};
pub use stat::{Stat, StatDefinition, StatSnapshot, StatValue};
