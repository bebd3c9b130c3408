//! Calendar and time-block loader.

use std::path::Path;

use progression_core::TimeConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for [`TimeConfig`] from TOML files.
///
/// ```toml
/// start_hour = 7.0
/// start_day_of_week = "Monday"
///
/// [[blocks]]
/// id = 1
/// label = "morning"
/// start_hour = 6
/// end_hour = 10
///
/// [activity_costs]
/// study = 4.0
/// ```
pub struct TimeLoader;

impl TimeLoader {
    pub fn load(path: &Path) -> LoadResult<TimeConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<TimeConfig> {
        let config: TimeConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse time TOML: {}", e))?;

        Ok(config)
    }
}
