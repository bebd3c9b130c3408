//! Topic-based event bus implementation.

use std::collections::HashMap;
use std::sync::Arc;

use progression_core::{EventSink, ProgressionEvent};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Clock movement and day rollovers
    Time,
    /// Skill level-ups and credit tier changes
    Progression,
    /// Snapshot saves and loads
    Persistence,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::Time, Topic::Progression, Topic::Persistence];
}

/// Runtime-side persistence notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PersistenceEvent {
    Saved { slot: String, autosave: bool },
    Loaded { slot: String },
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Progression(ProgressionEvent),
    Persistence(PersistenceEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Progression(
                ProgressionEvent::TimeAdvanced { .. } | ProgressionEvent::DayChanged { .. },
            ) => Topic::Time,
            Event::Progression(_) => Topic::Progression,
            Event::Persistence(_) => Topic::Persistence,
        }
    }
}

impl From<ProgressionEvent> for Event {
    fn from(event: ProgressionEvent) -> Self {
        Event::Progression(event)
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Channels for every topic exist from construction
/// on, so publishing never waits on a lock.
pub struct EventBus {
    channels: Arc<HashMap<Topic, broadcast::Sender<Event>>>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let channels = Topic::ALL
            .iter()
            .map(|&topic| (topic, broadcast::channel(capacity).0))
            .collect();

        Self {
            channels: Arc::new(channels),
        }
    }

    /// Publish an event to its corresponding topic
    ///
    /// Delivery is best-effort: with no subscribers the event is dropped.
    pub fn publish(&self, event: Event) {
        let topic = event.topic();

        if let Some(tx) = self.channels.get(&topic)
            && tx.send(event).is_err()
        {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        match self.channels.get(&topic) {
            Some(tx) => tx.subscribe(),
            // Unreachable: every topic is created in `with_capacity`.
            None => broadcast::channel(1).1,
        }
    }

    /// Subscribe to multiple topics
    ///
    /// Returns receivers for each requested topic.
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl EventSink for EventBus {
    fn publish(&mut self, event: ProgressionEvent) {
        EventBus::publish(self, Event::Progression(event));
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            channels: Arc::clone(&self.channels),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
