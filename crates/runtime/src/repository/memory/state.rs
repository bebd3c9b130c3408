//! In-memory StateRepository implementation for tests and local runs.

use std::collections::BTreeMap;
use std::sync::RwLock;

use progression_core::ProgressionSnapshot;

use crate::repository::traits::is_valid_slot;
use crate::repository::{RepositoryError, Result, StateRepository};

/// In-memory implementation of StateRepository.
pub struct InMemoryStateRepo {
    slots: RwLock<BTreeMap<String, ProgressionSnapshot>>,
}

impl InMemoryStateRepo {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(BTreeMap::new()),
        }
    }
}

impl Default for InMemoryStateRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl StateRepository for InMemoryStateRepo {
    fn save(&self, slot: &str, snapshot: &ProgressionSnapshot) -> Result<()> {
        if !is_valid_slot(slot) {
            return Err(RepositoryError::InvalidSlot(slot.to_string()));
        }
        let mut slots = self
            .slots
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        slots.insert(slot.to_string(), snapshot.clone());
        Ok(())
    }

    fn load(&self, slot: &str) -> Result<Option<ProgressionSnapshot>> {
        let slots = self
            .slots
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(slots.get(slot).cloned())
    }

    fn exists(&self, slot: &str) -> bool {
        self.slots
            .read()
            .map(|slots| slots.contains_key(slot))
            .unwrap_or(false)
    }

    fn delete(&self, slot: &str) -> Result<()> {
        let mut slots = self
            .slots
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        slots.remove(slot);
        Ok(())
    }

    fn list_slots(&self) -> Result<Vec<String>> {
        let slots = self
            .slots
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(slots.keys().cloned().collect())
    }
}
