//! File-based StateRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use progression_core::ProgressionSnapshot;

use crate::repository::traits::is_valid_slot;
use crate::repository::{RepositoryError, Result, StateRepository};

/// File-based implementation of StateRepository.
///
/// Stores snapshots as individual bincode files named `slot_{name}.bin`.
/// Writes go to a temporary file first and are moved into place with a
/// rename, so a crash mid-save leaves the previous save intact.
pub struct FileStateRepository {
    base_dir: PathBuf,
}

impl FileStateRepository {
    /// Create a new file-based state repository.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).map_err(RepositoryError::Io)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the path to a slot file.
    fn slot_path(&self, slot: &str) -> Result<PathBuf> {
        if !is_valid_slot(slot) {
            return Err(RepositoryError::InvalidSlot(slot.to_string()));
        }
        Ok(self.base_dir.join(format!("slot_{}.bin", slot)))
    }
}

impl StateRepository for FileStateRepository {
    fn save(&self, slot: &str, snapshot: &ProgressionSnapshot) -> Result<()> {
        let path = self.slot_path(slot)?;
        let temp_path = path.with_extension("bin.tmp");

        let bytes = bincode::serialize(snapshot)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        fs::write(&temp_path, bytes).map_err(RepositoryError::Io)?;
        fs::rename(&temp_path, &path).map_err(RepositoryError::Io)?;

        tracing::debug!("Saved slot[{}] to {}", slot, path.display());

        Ok(())
    }

    fn load(&self, slot: &str) -> Result<Option<ProgressionSnapshot>> {
        let path = self.slot_path(slot)?;

        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path).map_err(RepositoryError::Io)?;
        let snapshot: ProgressionSnapshot = bincode::deserialize(&bytes)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        tracing::debug!("Loaded slot[{}] from {}", slot, path.display());

        Ok(Some(snapshot))
    }

    fn exists(&self, slot: &str) -> bool {
        self.slot_path(slot).is_ok_and(|path| path.exists())
    }

    fn delete(&self, slot: &str) -> Result<()> {
        let path = self.slot_path(slot)?;

        if path.exists() {
            fs::remove_file(&path).map_err(RepositoryError::Io)?;
            tracing::debug!("Deleted slot[{}]", slot);
        }

        Ok(())
    }

    fn list_slots(&self) -> Result<Vec<String>> {
        let mut slots = Vec::new();

        let entries = fs::read_dir(&self.base_dir).map_err(RepositoryError::Io)?;

        for entry in entries {
            let entry = entry.map_err(RepositoryError::Io)?;
            let path = entry.path();

            if let Some(filename) = path.file_name().and_then(|s| s.to_str())
                && let Some(slot) = filename
                    .strip_prefix("slot_")
                    .and_then(|s| s.strip_suffix(".bin"))
                && is_valid_slot(slot)
            {
                slots.push(slot.to_string());
            }
        }

        slots.sort_unstable();
        Ok(slots)
    }
}
