use clap::Subcommand;
use focusbank_core::Settings;

use super::{print_json, CliResult};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print all settings as JSON
    Show,
    /// Get a single settings value
    Get { key: String },
    /// Set a settings value and persist
    Set { key: String, value: String },
}

const DURATION_KEYS: &[&str] = &[
    "work_duration",
    "short_break_duration",
    "long_break_duration",
    "long_break_interval",
];

pub fn run(action: ConfigAction) -> CliResult {
    let mut settings = Settings::load()?;

    match action {
        ConfigAction::Show => print_json(&settings),
        ConfigAction::Get { key } => {
            match settings.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown settings key: {key}").into()),
            }
            Ok(())
        }
        ConfigAction::Set { key, value } => {
            if DURATION_KEYS.contains(&key.as_str()) {
                // Non-numeric duration edits are ignored, previous value
                // retained; negatives clamp to zero.
                settings.set_duration_field(&key, &value)?;
                settings.save()?;
            } else {
                settings.set(&key, &value)?;
            }
            print_json(&settings)
        }
    }
}
