//! CLI configuration loaded from the environment.
use std::env;
use std::path::PathBuf;

/// Directories and defaults shared by every command.
#[derive(Clone, Debug)]
pub struct CliConfig {
    pub data_dir: PathBuf,
    pub save_dir: PathBuf,
    pub player_id: String,
    pub event_buffer: usize,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("crates/game/content/data"),
            save_dir: PathBuf::from("saves"),
            player_id: "player".to_string(),
            event_buffer: 256,
        }
    }
}

impl CliConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `PROGRESSION_DATA_DIR` - Content directory (default: `crates/game/content/data`)
    /// - `PROGRESSION_SAVE_DIR` - Save slot directory (default: `saves`)
    /// - `PROGRESSION_PLAYER_ID` - Player id for fresh engines (default: `player`)
    /// - `PROGRESSION_EVENT_BUFFER` - Per-topic event buffer (default: 256)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("PROGRESSION_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = env::var("PROGRESSION_SAVE_DIR") {
            config.save_dir = PathBuf::from(dir);
        }
        if let Ok(player_id) = env::var("PROGRESSION_PLAYER_ID") {
            config.player_id = player_id;
        }
        if let Some(capacity) = read_env::<usize>("PROGRESSION_EVENT_BUFFER") {
            config.event_buffer = capacity.max(1);
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
