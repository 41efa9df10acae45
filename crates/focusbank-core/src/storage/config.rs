//! TOML-based application settings.
//!
//! Stores user preferences including:
//! - Interval durations and the long-break cadence
//! - Alarm sound selection per mode
//! - Display flags
//!
//! Settings are stored at `~/.config/focusbank/config.toml`.
//! The schedule start time and pinned breaks live in the schedule bucket
//! of the store, not here.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ValidationError;

/// Application settings.
///
/// Serialized to/from TOML at `~/.config/focusbank/config.toml`.
/// All durations are in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_work_duration")]
    pub work_duration: i64,
    #[serde(default = "default_short_break")]
    pub short_break_duration: i64,
    #[serde(default = "default_long_break")]
    pub long_break_duration: i64,
    /// Completed work units between long breaks.
    #[serde(default = "default_long_break_interval")]
    pub long_break_interval: u32,
    /// Sound-selection token handed to the alarm collaborator when a work
    /// interval completes.
    #[serde(default = "default_alarm_work")]
    pub alarm_work: String,
    /// Token for the end-of-break chime.
    #[serde(default = "default_alarm_break")]
    pub alarm_break: String,
    #[serde(default = "default_true")]
    pub show_seconds: bool,
    #[serde(default = "default_true")]
    pub notifications_enabled: bool,
}

fn default_work_duration() -> i64 {
    25 * 60
}
fn default_short_break() -> i64 {
    5 * 60
}
fn default_long_break() -> i64 {
    15 * 60
}
fn default_long_break_interval() -> u32 {
    4
}
fn default_alarm_work() -> String {
    "bell".into()
}
fn default_alarm_break() -> String {
    "chime".into()
}
fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_duration: default_work_duration(),
            short_break_duration: default_short_break(),
            long_break_duration: default_long_break(),
            long_break_interval: default_long_break_interval(),
            alarm_work: default_alarm_work(),
            alarm_break: default_alarm_break(),
            show_seconds: true,
            notifications_enabled: true,
        }
    }
}

impl Settings {
    fn path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, falling back to defaults when the file is missing or
    /// cannot be parsed.
    ///
    /// # Errors
    ///
    /// Returns an error only if the default settings cannot be written back
    /// to disk.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<Settings>(&content) {
                Ok(cfg) => Ok(cfg),
                Err(_) => Ok(Self::default()),
            },
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be serialized or written.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(Self::path()?, content)?;
        Ok(())
    }

    /// Get a settings value as string by key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        match json.get(key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a settings value by key and persist. Returns an error for
    /// unknown keys, unparseable values, or values that break the duration
    /// invariants.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
        let mut json = serde_json::to_value(&*self)?;
        let obj = json
            .as_object_mut()
            .ok_or("settings are not a table")?;
        let existing = obj
            .get(key)
            .ok_or_else(|| format!("unknown settings key: {key}"))?;

        let new_value = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(value.parse::<bool>()?),
            serde_json::Value::Number(_) => {
                let n = value
                    .parse::<i64>()
                    .map_err(|_| format!("cannot parse '{value}' as number"))?;
                serde_json::Value::Number(n.into())
            }
            _ => serde_json::Value::String(value.into()),
        };
        obj.insert(key.to_string(), new_value);

        let updated: Settings = serde_json::from_value(json)?;
        updated.validate()?;
        *self = updated;
        self.save()?;
        Ok(())
    }

    /// Check the duration invariants: all durations positive, interval >= 1.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("work_duration", self.work_duration),
            ("short_break_duration", self.short_break_duration),
            ("long_break_duration", self.long_break_duration),
        ] {
            if value <= 0 {
                return Err(ValidationError::NonPositiveDuration {
                    field: field.to_string(),
                });
            }
        }
        if self.long_break_interval < 1 {
            return Err(ValidationError::ZeroInterval);
        }
        Ok(())
    }

    /// Apply a single numeric edit. Input that does not parse, or that
    /// would break the positive-duration invariant, keeps the previous
    /// value.
    pub fn set_duration_field(&mut self, field: &str, raw: &str) -> Result<(), ValidationError> {
        let Ok(value) = raw.parse::<i64>() else {
            // Non-numeric edit: previous value retained.
            return Ok(());
        };
        match field {
            "work_duration" if value > 0 => self.work_duration = value,
            "short_break_duration" if value > 0 => self.short_break_duration = value,
            "long_break_duration" if value > 0 => self.long_break_duration = value,
            "long_break_interval" => self.long_break_interval = value.max(1) as u32,
            "work_duration" | "short_break_duration" | "long_break_duration" => {}
            _ => {
                return Err(ValidationError::InvalidValue {
                    field: field.to_string(),
                    message: "unknown duration field".into(),
                })
            }
        }
        Ok(())
    }
}
