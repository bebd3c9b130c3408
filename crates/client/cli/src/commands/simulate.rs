//! Run a player through time on the runtime and report what happened.

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::broadcast::error::TryRecvError;

use progression_content::ContentFactory;
use progression_runtime::{Event, FileStateRepository, Runtime, RuntimeConfig, Topic};

use super::show::print_summary;
use crate::config::CliConfig;

/// Advance a player through time
#[derive(Parser)]
pub struct Simulate {
    /// Total in-game hours to advance
    #[arg(long, default_value_t = 24.0)]
    hours: f32,

    /// Hours per simulation step; each step also ticks modifiers by the same span
    #[arg(long, default_value_t = 1.0)]
    step: f32,

    /// Reserve a block before starting, as BLOCK=ACTIVITY (repeatable)
    #[arg(long = "allocate", value_name = "BLOCK=ACTIVITY", value_parser = parse_allocation)]
    allocations: Vec<(u32, String)>,

    /// Grant skill experience before starting, as SKILL=AMOUNT (repeatable)
    #[arg(long = "train", value_name = "SKILL=AMOUNT", value_parser = parse_training)]
    training: Vec<(String, f32)>,

    /// Adjust the social-credit score before starting
    #[arg(long, allow_negative_numbers = true)]
    credit: Option<f32>,

    /// Resume from this slot instead of starting fresh
    #[arg(long, value_name = "SLOT")]
    resume: Option<String>,

    /// Save the final state into this slot
    #[arg(long, value_name = "SLOT")]
    save: Option<String>,

    /// Autosave into the `autosave` slot on every day change
    #[arg(long)]
    autosave: bool,

    /// Print events as JSON lines instead of text
    #[arg(long)]
    json: bool,
}

impl Simulate {
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let definitions = ContentFactory::new(&config.data_dir)
            .load_definitions()
            .with_context(|| format!("loading content from {}", config.data_dir.display()))?;
        let repository = FileStateRepository::new(&config.save_dir)?;

        let runtime_config = RuntimeConfig {
            player_id: config.player_id.clone(),
            event_buffer_size: config.event_buffer,
            autosave_on_day_change: self.autosave,
            ..RuntimeConfig::default()
        };

        let mut builder = Runtime::builder()
            .config(runtime_config)
            .definitions(definitions)
            .repository(repository);
        if let Some(slot) = &self.resume {
            builder = builder.resume_from(slot.clone());
        }
        let runtime = builder.build().await?;
        let handle = runtime.handle();
        let mut receivers = handle.subscribe_multiple(&Topic::ALL);

        for (block_id, activity_id) in &self.allocations {
            match handle.allocate(*block_id, activity_id.clone()).await {
                Ok(()) => tracing::info!("allocated block {} to {}", block_id, activity_id),
                Err(err) => tracing::warn!("could not allocate block {}: {}", block_id, err),
            }
        }
        for (skill_id, amount) in &self.training {
            handle.add_experience(skill_id.clone(), *amount).await?;
        }
        if let Some(delta) = self.credit {
            handle.adjust_credit(delta).await?;
        }

        let step = if self.step.is_finite() && self.step > 0.0 {
            self.step
        } else {
            1.0
        };
        let mut remaining = self.hours.max(0.0);
        while remaining > 0.0 {
            let hours = remaining.min(step);
            handle.tick(hours * 3600.0).await?;
            handle.advance_time(hours).await?;
            remaining -= hours;
        }

        if let Some(slot) = &self.save {
            handle.save(slot.clone()).await?;
        }
        let snapshot = handle.snapshot().await?;

        let mut events = Vec::new();
        for topic in Topic::ALL {
            let Some(rx) = receivers.get_mut(&topic) else {
                continue;
            };
            loop {
                match rx.try_recv() {
                    Ok(event) => events.push(event),
                    Err(TryRecvError::Lagged(skipped)) => {
                        tracing::warn!("{:?} topic dropped {} events", topic, skipped);
                    }
                    Err(_) => break,
                }
            }
        }
        print_events(&events, self.json)?;

        if self.json {
            println!("{}", serde_json::to_string(&snapshot)?);
        } else {
            print_summary(&snapshot);
        }

        drop(receivers);
        drop(handle);
        runtime.shutdown().await?;
        Ok(())
    }
}

fn print_events(events: &[Event], json: bool) -> Result<()> {
    for event in events {
        if json {
            println!("{}", serde_json::to_string(event)?);
        } else {
            println!("{:?}", event);
        }
    }
    Ok(())
}

fn parse_allocation(raw: &str) -> std::result::Result<(u32, String), String> {
    let (block, activity) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected BLOCK=ACTIVITY, got '{raw}'"))?;
    let block = block
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid block id '{block}': {e}"))?;
    Ok((block, activity.trim().to_string()))
}

fn parse_training(raw: &str) -> std::result::Result<(String, f32), String> {
    let (skill, amount) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected SKILL=AMOUNT, got '{raw}'"))?;
    let amount = amount
        .trim()
        .parse::<f32>()
        .map_err(|e| format!("invalid amount '{amount}': {e}"))?;
    Ok((skill.trim().to_string(), amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_key_value_arguments() {
        assert_eq!(parse_allocation("2=study"), Ok((2, "study".to_string())));
        assert!(parse_allocation("morning=study").is_err());
        assert_eq!(parse_training("athletics=150"), Ok(("athletics".to_string(), 150.0)));
        assert!(parse_training("athletics").is_err());
    }
}
