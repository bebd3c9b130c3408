//! Topic-based event bus for runtime events.
//!
//! Core [`ProgressionEvent`](progression_core::ProgressionEvent)s and the
//! runtime's own persistence notifications are published to topics, and
//! consumers subscribe only to the topics they need.

mod bus;

pub use bus::{Event, EventBus, PersistenceEvent, Topic};
