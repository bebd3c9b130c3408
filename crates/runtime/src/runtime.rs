//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker, wires up command/event channels,
//! and exposes a builder-based API for clients to drive the engine.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use progression_core::{DefinitionOracle, ProgressionEngine, ProgressionSnapshot};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::events::EventBus;
use crate::repository::StateRepository;
use crate::workers::{AutosavePolicy, Command, SimulationWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub player_id: String,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Save to `autosave_slot` whenever a day boundary is crossed (default: false)
    pub autosave_on_day_change: bool,
    pub autosave_slot: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            player_id: "player".to_string(),
            event_buffer_size: 100,
            command_buffer_size: 32,
            autosave_on_day_change: false,
            autosave_slot: "autosave".to_string(),
        }
    }
}

/// Main runtime that hosts one player's progression
///
/// Design: Runtime owns the worker task. [`RuntimeHandle`] provides a
/// cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    sim_worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Shutdown the runtime gracefully
    ///
    /// The worker stops once this and every cloned handle are dropped, after
    /// draining the commands already queued.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    definitions: Option<Arc<dyn DefinitionOracle>>,
    repository: Option<Arc<dyn StateRepository>>,
    snapshot: Option<ProgressionSnapshot>,
    resume_slot: Option<String>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            definitions: None,
            repository: None,
            snapshot: None,
            resume_slot: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the required content definitions
    pub fn definitions(mut self, definitions: impl DefinitionOracle + 'static) -> Self {
        self.definitions = Some(Arc::new(definitions));
        self
    }

    /// Set a state repository for save/load and autosave (optional)
    pub fn repository(mut self, repository: impl StateRepository + 'static) -> Self {
        self.repository = Some(Arc::new(repository));
        self
    }

    /// Share an existing repository with the runtime
    pub fn shared_repository(mut self, repository: Arc<dyn StateRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Start from a snapshot instead of fresh definitions
    pub fn initial_snapshot(mut self, snapshot: ProgressionSnapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    /// Start from a repository slot when it holds a save; otherwise start
    /// fresh. An explicit [`initial_snapshot`](Self::initial_snapshot) wins.
    pub fn resume_from(mut self, slot: impl Into<String>) -> Self {
        self.resume_slot = Some(slot.into());
        self
    }

    /// Build the runtime and spawn its worker onto the current tokio runtime
    pub async fn build(self) -> Result<Runtime> {
        let definitions = self.definitions.ok_or(RuntimeError::MissingDefinitions)?;

        let snapshot = match (self.snapshot, &self.resume_slot, &self.repository) {
            (Some(snapshot), _, _) => Some(snapshot),
            (None, Some(slot), Some(repository)) => repository.load(slot)?,
            (None, Some(_), None) => return Err(RuntimeError::NoRepository),
            (None, None, _) => None,
        };

        let engine = match snapshot {
            Some(snapshot) => {
                tracing::info!("Restoring player '{}' from snapshot", snapshot.player_id());
                ProgressionEngine::restore(snapshot, definitions.as_ref())
                    .map_err(RuntimeError::Restore)?
            }
            None => ProgressionEngine::from_definitions(
                self.config.player_id.clone(),
                definitions.as_ref(),
            )
            .map_err(RuntimeError::InitialState)?,
        };

        let (command_tx, command_rx) =
            mpsc::channel::<Command>(self.config.command_buffer_size.max(1));
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let autosave = AutosavePolicy {
            on_day_change: self.config.autosave_on_day_change,
            slot: self.config.autosave_slot.clone(),
        };

        let sim_worker = SimulationWorker::new(
            engine,
            definitions,
            self.repository,
            autosave,
            command_rx,
            event_bus,
        );

        let sim_worker_handle = tokio::spawn(async move {
            sim_worker.run().await;
        });

        Ok(Runtime {
            handle,
            sim_worker_handle,
        })
    }
}
