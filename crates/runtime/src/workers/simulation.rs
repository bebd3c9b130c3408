//! Simulation worker that owns the authoritative [`ProgressionEngine`].
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), applies
//! them to the engine one at a time, and publishes events to the EventBus.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use progression_core::{
    AllocationError, DefinitionOracle, Modifier, ProgressionEngine, ProgressionSnapshot,
    ScheduleState, StatValue, TierChange,
};

use crate::api::{Result, RuntimeError};
use crate::events::{Event, EventBus, PersistenceEvent};
use crate::repository::StateRepository;

/// Commands that can be sent to the simulation worker
pub enum Command {
    /// Advance modifier lifetimes and refresh skill boosts.
    Tick {
        delta_seconds: f32,
        reply: oneshot::Sender<()>,
    },
    /// Move the calendar forward. Replies with the day boundaries crossed.
    AdvanceTime {
        hours: f32,
        reply: oneshot::Sender<u32>,
    },
    AddExperience {
        skill_id: String,
        amount: f32,
        reply: oneshot::Sender<u32>,
    },
    AdjustCredit {
        delta: f32,
        reply: oneshot::Sender<Option<TierChange>>,
    },
    ApplyBaseDelta {
        stat_id: String,
        delta: f32,
        reply: oneshot::Sender<StatValue>,
    },
    ApplyModifier {
        stat_id: String,
        modifier: Modifier,
        reply: oneshot::Sender<StatValue>,
    },
    RemoveModifiers {
        stat_id: String,
        source: String,
        reply: oneshot::Sender<StatValue>,
    },
    Allocate {
        block_id: u32,
        activity_id: String,
        reply: oneshot::Sender<std::result::Result<(), AllocationError>>,
    },
    Release {
        block_id: u32,
        reply: oneshot::Sender<bool>,
    },
    ResetBlocks {
        reply: oneshot::Sender<()>,
    },
    HasTimeFor {
        activity_id: String,
        reply: oneshot::Sender<bool>,
    },
    QueryStat {
        stat_id: String,
        reply: oneshot::Sender<StatValue>,
    },
    QuerySchedule {
        reply: oneshot::Sender<ScheduleState>,
    },
    QuerySnapshot {
        reply: oneshot::Sender<ProgressionSnapshot>,
    },
    /// Persist the current snapshot into a slot.
    Save {
        slot: String,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Replace the engine with the snapshot stored in a slot.
    Load {
        slot: String,
        reply: oneshot::Sender<Result<()>>,
    },
}

/// Autosave settings handed to the worker.
#[derive(Debug, Clone)]
pub struct AutosavePolicy {
    pub on_day_change: bool,
    pub slot: String,
}

/// Background task that processes progression commands.
pub struct SimulationWorker {
    engine: ProgressionEngine,
    definitions: Arc<dyn DefinitionOracle>,
    repository: Option<Arc<dyn StateRepository>>,
    autosave: AutosavePolicy,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
}

impl SimulationWorker {
    /// Creates a new simulation worker.
    pub fn new(
        engine: ProgressionEngine,
        definitions: Arc<dyn DefinitionOracle>,
        repository: Option<Arc<dyn StateRepository>>,
        autosave: AutosavePolicy,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
    ) -> Self {
        info!(
            "SimulationWorker initialized for player '{}' with {} stats, {} skills",
            engine.player_id(),
            engine.stats().len(),
            engine.skills().skills().count()
        );

        Self {
            engine,
            definitions,
            repository,
            autosave,
            command_rx,
            event_bus,
        }
    }

    /// Main worker loop. Exits once every handle is dropped.
    pub async fn run(mut self) {
        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd);
        }
        debug!("SimulationWorker command channel closed, shutting down");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Tick {
                delta_seconds,
                reply,
            } => {
                self.engine.tick(delta_seconds);
                respond(reply, (), "Tick");
            }
            Command::AdvanceTime { hours, reply } => {
                let days = self.engine.advance_time(hours, &mut self.event_bus);
                if days > 0 && self.autosave.on_day_change {
                    self.autosave();
                }
                respond(reply, days, "AdvanceTime");
            }
            Command::AddExperience {
                skill_id,
                amount,
                reply,
            } => {
                let levels = self
                    .engine
                    .add_experience(&skill_id, amount, &mut self.event_bus);
                respond(reply, levels, "AddExperience");
            }
            Command::AdjustCredit { delta, reply } => {
                let change = self.engine.adjust_credit(delta, &mut self.event_bus);
                respond(reply, change, "AdjustCredit");
            }
            Command::ApplyBaseDelta {
                stat_id,
                delta,
                reply,
            } => {
                self.engine.apply_base_delta(&stat_id, delta);
                respond(reply, self.engine.stat_value(&stat_id), "ApplyBaseDelta");
            }
            Command::ApplyModifier {
                stat_id,
                modifier,
                reply,
            } => {
                self.engine.apply_modifier(&stat_id, modifier);
                respond(reply, self.engine.stat_value(&stat_id), "ApplyModifier");
            }
            Command::RemoveModifiers {
                stat_id,
                source,
                reply,
            } => {
                self.engine.remove_modifiers_by_source(&stat_id, &source);
                respond(reply, self.engine.stat_value(&stat_id), "RemoveModifiers");
            }
            Command::Allocate {
                block_id,
                activity_id,
                reply,
            } => {
                let result = self.engine.allocate(block_id, &activity_id);
                respond(reply, result, "Allocate");
            }
            Command::Release { block_id, reply } => {
                respond(reply, self.engine.release(block_id), "Release");
            }
            Command::ResetBlocks { reply } => {
                self.engine.reset_blocks();
                respond(reply, (), "ResetBlocks");
            }
            Command::HasTimeFor { activity_id, reply } => {
                respond(reply, self.engine.has_time_for(&activity_id), "HasTimeFor");
            }
            Command::QueryStat { stat_id, reply } => {
                respond(reply, self.engine.stat_value(&stat_id), "QueryStat");
            }
            Command::QuerySchedule { reply } => {
                respond(reply, self.engine.schedule_state(), "QuerySchedule");
            }
            Command::QuerySnapshot { reply } => {
                respond(reply, self.engine.snapshot(), "QuerySnapshot");
            }
            Command::Save { slot, reply } => {
                let result = self.save(&slot, false);
                respond(reply, result, "Save");
            }
            Command::Load { slot, reply } => {
                let result = self.load(&slot);
                respond(reply, result, "Load");
            }
        }
    }

    fn repository(&self) -> Result<&Arc<dyn StateRepository>> {
        self.repository.as_ref().ok_or(RuntimeError::NoRepository)
    }

    fn save(&self, slot: &str, autosave: bool) -> Result<()> {
        self.repository()?.save(slot, &self.engine.snapshot())?;
        self.event_bus
            .publish(Event::Persistence(PersistenceEvent::Saved {
                slot: slot.to_string(),
                autosave,
            }));
        Ok(())
    }

    fn autosave(&self) {
        if self.repository.is_none() {
            return;
        }
        let slot = self.autosave.slot.clone();
        if let Err(err) = self.save(&slot, true) {
            warn!(slot = %slot, error = %err, "autosave failed");
        }
    }

    fn load(&mut self, slot: &str) -> Result<()> {
        let snapshot = self
            .repository()?
            .load(slot)?
            .ok_or_else(|| RuntimeError::SlotNotFound(slot.to_string()))?;
        self.engine = ProgressionEngine::restore(snapshot, self.definitions.as_ref())
            .map_err(RuntimeError::Restore)?;
        self.event_bus
            .publish(Event::Persistence(PersistenceEvent::Loaded {
                slot: slot.to_string(),
            }));
        Ok(())
    }
}

fn respond<T>(reply: oneshot::Sender<T>, value: T, command: &'static str) {
    if reply.send(value).is_err() {
        debug!("{} reply channel closed (caller dropped)", command);
    }
}
