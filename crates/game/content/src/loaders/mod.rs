//! Content loaders for reading progression data from files.
//!
//! Each loader turns one RON/TOML file into `progression-core` definition
//! types; [`ContentFactory`] bundles them into a
//! [`DefinitionSnapshot`](progression_core::DefinitionSnapshot).

pub mod credit;
pub mod factory;
pub mod skills;
pub mod stats;
pub mod time;

pub use credit::CreditLoader;
pub use factory::ContentFactory;
pub use skills::SkillLoader;
pub use stats::StatLoader;
pub use time::TimeLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
