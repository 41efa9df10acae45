mod config;
pub mod store;

pub use config::Settings;
pub use store::Store;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Logical persistence buckets. Each is loaded independently at startup and
/// saved on every mutation; a missing or corrupt bucket falls back to its
/// default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Bucket {
    Tasks,
    Log,
    PomodoroCount,
    Schedule,
    Engine,
}

impl Bucket {
    pub fn key(self) -> &'static str {
        match self {
            Bucket::Tasks => "tasks",
            Bucket::Log => "log",
            Bucket::PomodoroCount => "pomodoro_count",
            Bucket::Schedule => "schedule",
            Bucket::Engine => "engine",
        }
    }
}

/// Returns `~/.config/focusbank[-dev]/` based on FOCUSBANK_ENV.
///
/// Set FOCUSBANK_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("FOCUSBANK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("focusbank-dev")
    } else {
        base_dir.join("focusbank")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
