//! Stat definition loader.

use std::path::Path;

use progression_core::StatDefinition;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Stat catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatCatalog {
    pub stats: Vec<StatDefinition>,
}

/// Loader for stat definitions from RON files.
pub struct StatLoader;

impl StatLoader {
    /// Load stat definitions from a RON file containing a `StatCatalog`.
    pub fn load(path: &Path) -> LoadResult<Vec<StatDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<StatDefinition>> {
        let catalog: StatCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse stat catalog RON: {}", e))?;

        Ok(catalog.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growth_rate_defaults_to_zero() {
        let stats = StatLoader::parse(
            r#"(stats: [(id: "focus", base_value: 5.0, min_value: 0.0, max_value: 10.0)])"#,
        )
        .unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].growth_rate, 0.0);
    }

    #[test]
    fn parse_error_mentions_catalog() {
        let err = StatLoader::parse("(stats: [oops])").unwrap_err();
        assert!(err.to_string().contains("stat catalog"));
    }
}
