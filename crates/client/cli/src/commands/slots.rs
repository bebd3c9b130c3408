//! List save slots.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use progression_runtime::{FileStateRepository, StateRepository};

use crate::config::CliConfig;

/// List save slots
#[derive(Parser)]
pub struct Slots {
    /// Save directory (defaults to PROGRESSION_SAVE_DIR)
    #[arg(short, long, value_name = "DIR")]
    save_dir: Option<PathBuf>,
}

impl Slots {
    pub fn execute(self, config: &CliConfig) -> Result<()> {
        let save_dir = self.save_dir.unwrap_or_else(|| config.save_dir.clone());
        let repository = FileStateRepository::new(&save_dir)?;

        let slots = repository.list_slots()?;
        if slots.is_empty() {
            println!("no saves in {}", save_dir.display());
        }
        for slot in slots {
            println!("{slot}");
        }
        Ok(())
    }
}
