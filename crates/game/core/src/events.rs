//! Notifications published by the engine.
//!
//! Every notification is a variant of the closed [`ProgressionEvent`] enum
//! with strongly-typed fields. Publishing is fire-and-forget: an
//! [`EventSink`] has no return value and must accept events even when nobody
//! is listening.

use crate::time::DayOfWeek;

/// Events emitted while the simulation advances.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProgressionEvent {
    /// The clock moved forward by `delta` hours and now reads `hour`.
    TimeAdvanced { hour: f32, delta: f32 },

    /// At least one day boundary was crossed; carries the final calendar day.
    DayChanged { day: u32, day_of_week: DayOfWeek },

    /// A skill reached a new level.
    SkillLeveledUp { skill_id: String, level: u32 },

    /// The social-credit score moved into a different tier.
    CreditTierChanged {
        from: String,
        to: String,
        score: f32,
    },
}

impl ProgressionEvent {
    /// Stable identifier for routing and logging.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::TimeAdvanced { .. } => "time_advanced",
            Self::DayChanged { .. } => "day_changed",
            Self::SkillLeveledUp { .. } => "skill_leveled_up",
            Self::CreditTierChanged { .. } => "credit_tier_changed",
        }
    }
}

/// Destination for [`ProgressionEvent`]s.
pub trait EventSink {
    fn publish(&mut self, event: ProgressionEvent);
}

/// Sink that drops every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn publish(&mut self, _event: ProgressionEvent) {}
}

/// Collects events in publication order (handy for tests and batching).
impl EventSink for Vec<ProgressionEvent> {
    fn publish(&mut self, event: ProgressionEvent) {
        self.push(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn publish(&mut self, event: ProgressionEvent) {
        (**self).publish(event);
    }
}
