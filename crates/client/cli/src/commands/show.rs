//! Print a saved snapshot.

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;

use progression_core::ProgressionSnapshot;
use progression_runtime::{FileStateRepository, StateRepository};

use crate::config::CliConfig;

/// Print a saved snapshot
#[derive(Parser)]
pub struct Show {
    /// Slot to read
    #[arg(value_name = "SLOT")]
    slot: String,

    /// Save directory (defaults to PROGRESSION_SAVE_DIR)
    #[arg(short, long, value_name = "DIR")]
    save_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    /// Clock, stats and skill levels
    Summary,
    /// Full JSON output
    Json,
}

impl Show {
    pub fn execute(self, config: &CliConfig) -> Result<()> {
        let save_dir = self.save_dir.unwrap_or_else(|| config.save_dir.clone());
        let repository = FileStateRepository::new(&save_dir)?;

        let Some(snapshot) = repository.load(&self.slot)? else {
            bail!("slot '{}' not found in {}", self.slot, save_dir.display());
        };

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&snapshot)?),
            OutputFormat::Summary => print_summary(&snapshot),
        }
        Ok(())
    }
}

pub(crate) fn print_summary(snapshot: &ProgressionSnapshot) {
    let clock = &snapshot.time.clock;
    println!("player {}", snapshot.player_id());
    println!(
        "  year {} month {} week {} day {} ({}) {:05.2}h",
        clock.year, clock.month, clock.week, clock.day, clock.day_of_week, clock.hour
    );
    println!("  credit {:.1} [{}]", snapshot.credit.score, snapshot.credit.tier);
    for stat in &snapshot.stats.stats {
        println!(
            "  {:<14} {:>8.2}  (base {:.2}, {} modifiers)",
            stat.id,
            stat.current,
            stat.base,
            stat.modifiers.len()
        );
    }
    for skill in &snapshot.skills {
        println!(
            "  skill {:<10} lv {:>2}  {:.1}/{:.1} xp",
            skill.id, skill.level, skill.experience, skill.next_level_threshold
        );
    }
}
