mod history;
mod settings;

pub use history::{HistoryDb, KindStat, SessionRecord, SessionStats, StatsRange};
pub use settings::{Settings, SettingsHandle, Theme};

use std::path::PathBuf;

/// Returns `~/.config/tunggu[-dev]/` based on TUNGGU_ENV.
///
/// Set TUNGGU_ENV=dev to use a separate development data directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("TUNGGU_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("tunggu-dev")
    } else {
        base_dir.join("tunggu")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
