//! Repository contract for saving and loading progression snapshots.

use progression_core::ProgressionSnapshot;

use super::error::Result;

/// Repository for snapshot persistence, keyed by save slot.
///
/// Slot names are restricted to ASCII letters, digits, `-` and `_`.
pub trait StateRepository: Send + Sync {
    /// Save a snapshot into a slot, replacing any previous contents.
    fn save(&self, slot: &str, snapshot: &ProgressionSnapshot) -> Result<()>;

    /// Load the snapshot stored in a slot.
    fn load(&self, slot: &str) -> Result<Option<ProgressionSnapshot>>;

    /// Check if a slot holds a snapshot.
    fn exists(&self, slot: &str) -> bool;

    /// Delete a slot. Deleting an empty slot is not an error.
    fn delete(&self, slot: &str) -> Result<()>;

    /// List all occupied slots in name order.
    fn list_slots(&self) -> Result<Vec<String>> {
        Ok(vec![])
    }
}

pub(crate) fn is_valid_slot(slot: &str) -> bool {
    !slot.is_empty()
        && slot
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
