//! Content factory for building the definitions bundle from data files.

use std::path::{Path, PathBuf};

use progression_core::{
    CreditConfig, DefinitionSnapshot, ProgressionConfig, SkillDefinition, StatDefinition,
    TimeConfig,
};
use tracing::debug;

use crate::loaders::{CreditLoader, LoadResult, SkillLoader, StatLoader, TimeLoader, read_file};

/// Content factory that loads all progression content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── stats.ron
/// ├── skills.ron
/// ├── time.toml
/// ├── credit.toml
/// └── progression.toml   (optional engine tunables)
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load stat definitions from `stats.ron`.
    pub fn load_stats(&self) -> LoadResult<Vec<StatDefinition>> {
        StatLoader::load(&self.data_dir.join("stats.ron"))
    }

    /// Load skill definitions from `skills.ron`.
    pub fn load_skills(&self) -> LoadResult<Vec<SkillDefinition>> {
        SkillLoader::load(&self.data_dir.join("skills.ron"))
    }

    /// Load the calendar and block layout from `time.toml`.
    pub fn load_time(&self) -> LoadResult<TimeConfig> {
        TimeLoader::load(&self.data_dir.join("time.toml"))
    }

    /// Load credit bounds and tiers from `credit.toml`.
    pub fn load_credit(&self) -> LoadResult<CreditConfig> {
        CreditLoader::load(&self.data_dir.join("credit.toml"))
    }

    /// Load engine tunables from `progression.toml`, or defaults when the
    /// file is absent.
    pub fn load_progression_config(&self) -> LoadResult<ProgressionConfig> {
        let path = self.data_dir.join("progression.toml");
        if !path.exists() {
            return Ok(ProgressionConfig::default());
        }
        let content = read_file(&path)?;
        toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse progression TOML: {}", e))
    }

    /// Load every file into one [`DefinitionSnapshot`].
    pub fn load_definitions(&self) -> LoadResult<DefinitionSnapshot> {
        let definitions = DefinitionSnapshot::new(
            self.load_stats()?,
            self.load_time()?,
            self.load_skills()?,
            self.load_credit()?,
        )
        .with_config(self.load_progression_config()?);

        debug!(
            data_dir = %self.data_dir.display(),
            stats = definitions.stats.len(),
            skills = definitions.skills.len(),
            blocks = definitions.time.blocks.len(),
            "loaded progression content"
        );
        Ok(definitions)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
