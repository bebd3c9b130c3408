//! Social-credit configuration loader.

use std::path::Path;

use progression_core::CreditConfig;

use crate::loaders::{LoadResult, read_file};

pub struct CreditLoader;

impl CreditLoader {
    pub fn load(path: &Path) -> LoadResult<CreditConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<CreditConfig> {
        let config: CreditConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse credit TOML: {}", e))?;

        Ok(config)
    }
}
