//! Runtime orchestration for the progression engine.
//!
//! This crate hosts a [`ProgressionEngine`](progression_core::ProgressionEngine)
//! on a single owning tokio task and exposes it through a cloneable
//! [`RuntimeHandle`]. Every mutation is serialized through that task.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`repository`] persists snapshots into named save slots
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod repository;
pub mod runtime;

mod workers;

pub use api::{Result, RuntimeError, RuntimeHandle};
pub use events::{Event, EventBus, PersistenceEvent, Topic};
pub use repository::{FileStateRepository, InMemoryStateRepo, RepositoryError, StateRepository};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
