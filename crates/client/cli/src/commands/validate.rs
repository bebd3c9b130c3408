//! Load content and build a throwaway engine from it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use progression_content::ContentFactory;
use progression_core::ProgressionEngine;

use crate::config::CliConfig;

/// Validate content files
#[derive(Parser)]
pub struct Validate {
    /// Content directory (defaults to PROGRESSION_DATA_DIR)
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,
}

impl Validate {
    pub fn execute(self, config: &CliConfig) -> Result<()> {
        let data_dir = self.data_dir.unwrap_or_else(|| config.data_dir.clone());
        let definitions = ContentFactory::new(&data_dir)
            .load_definitions()
            .with_context(|| format!("loading content from {}", data_dir.display()))?;

        let engine = ProgressionEngine::from_definitions(config.player_id.clone(), &definitions)
            .context("content loaded but failed validation")?;

        println!("content ok: {}", data_dir.display());
        println!("  stats:  {}", engine.stats().len());
        println!("  skills: {}", engine.skills().skills().count());
        println!("  blocks: {}", engine.schedule().blocks().len());
        println!("  credit: {} ({})", engine.credit().score(), engine.credit().tier().label);
        Ok(())
    }
}
