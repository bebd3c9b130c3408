//! Repository layer for persisted progression state.
//!
//! Repositories store [`ProgressionSnapshot`](progression_core::ProgressionSnapshot)s,
//! which change during play. Static content (definitions) is handed to the
//! runtime as a [`DefinitionOracle`](progression_core::DefinitionOracle) and
//! never stored here.

mod error;
mod file;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FileStateRepository;
pub use memory::InMemoryStateRepo;
pub use traits::StateRepository;
