//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! driving the engine or streaming events from specific topics.
use tokio::sync::{broadcast, mpsc, oneshot};

use progression_core::{Modifier, ProgressionSnapshot, ScheduleState, StatValue, TierChange};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Advance modifier timers by `delta_seconds` (skill boosts refresh first).
    pub async fn tick(&self, delta_seconds: f32) -> Result<()> {
        self.request(|reply| Command::Tick {
            delta_seconds,
            reply,
        })
        .await
    }

    /// Advance the clock; returns the number of day boundaries crossed.
    pub async fn advance_time(&self, hours: f32) -> Result<u32> {
        self.request(|reply| Command::AdvanceTime { hours, reply })
            .await
    }

    /// Grant skill experience; returns the number of levels gained.
    pub async fn add_experience(&self, skill_id: impl Into<String>, amount: f32) -> Result<u32> {
        let skill_id = skill_id.into();
        self.request(|reply| Command::AddExperience {
            skill_id,
            amount,
            reply,
        })
        .await
    }

    pub async fn adjust_credit(&self, delta: f32) -> Result<Option<TierChange>> {
        self.request(|reply| Command::AdjustCredit { delta, reply })
            .await
    }

    pub async fn apply_base_delta(&self, stat_id: impl Into<String>, delta: f32) -> Result<StatValue> {
        let stat_id = stat_id.into();
        self.request(|reply| Command::ApplyBaseDelta {
            stat_id,
            delta,
            reply,
        })
        .await
    }

    pub async fn apply_modifier(
        &self,
        stat_id: impl Into<String>,
        modifier: Modifier,
    ) -> Result<StatValue> {
        let stat_id = stat_id.into();
        self.request(|reply| Command::ApplyModifier {
            stat_id,
            modifier,
            reply,
        })
        .await
    }

    pub async fn remove_modifiers_by_source(
        &self,
        stat_id: impl Into<String>,
        source: impl Into<String>,
    ) -> Result<StatValue> {
        let (stat_id, source) = (stat_id.into(), source.into());
        self.request(|reply| Command::RemoveModifiers {
            stat_id,
            source,
            reply,
        })
        .await
    }

    /// Reserve a time block for an activity.
    pub async fn allocate(&self, block_id: u32, activity_id: impl Into<String>) -> Result<()> {
        let activity_id = activity_id.into();
        self.request(|reply| Command::Allocate {
            block_id,
            activity_id,
            reply,
        })
        .await?
        .map_err(RuntimeError::from)
    }

    pub async fn release(&self, block_id: u32) -> Result<bool> {
        self.request(|reply| Command::Release { block_id, reply })
            .await
    }

    /// Free every block without waiting for a day rollover.
    pub async fn reset_blocks(&self) -> Result<()> {
        self.request(|reply| Command::ResetBlocks { reply }).await
    }

    pub async fn has_time_for(&self, activity_id: impl Into<String>) -> Result<bool> {
        let activity_id = activity_id.into();
        self.request(|reply| Command::HasTimeFor { activity_id, reply })
            .await
    }

    pub async fn stat(&self, stat_id: impl Into<String>) -> Result<StatValue> {
        let stat_id = stat_id.into();
        self.request(|reply| Command::QueryStat { stat_id, reply })
            .await
    }

    pub async fn schedule(&self) -> Result<ScheduleState> {
        self.request(|reply| Command::QuerySchedule { reply }).await
    }

    /// Query the full persisted form of the engine (read-only copy)
    pub async fn snapshot(&self) -> Result<ProgressionSnapshot> {
        self.request(|reply| Command::QuerySnapshot { reply }).await
    }

    /// Save the current state into a repository slot
    pub async fn save(&self, slot: impl Into<String>) -> Result<()> {
        let slot = slot.into();
        self.request(|reply| Command::Save { slot, reply }).await?
    }

    /// Replace the running engine with the state stored in a slot
    pub async fn load(&self, slot: impl Into<String>) -> Result<()> {
        let slot = slot.into();
        self.request(|reply| Command::Load { slot, reply }).await?
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Time` - Clock advances and day changes
    /// - `Topic::Progression` - Skill level-ups and credit tier changes
    /// - `Topic::Persistence` - Saves and loads
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use progression_runtime::Topic;
    ///
    /// let mut time_rx = handle.subscribe(Topic::Time);
    /// while let Ok(event) = time_rx.recv().await {
    ///     // Handle time events
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> std::collections::HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
