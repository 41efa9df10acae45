pub mod config;
pub mod schedule;
pub mod stats;
pub mod task;
pub mod timer;

use focusbank_core::{EffectOutcome, Session, Settings, Store};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Load settings and rebuild the session from the store's buckets.
pub fn load_session() -> Result<(Store, Session), Box<dyn std::error::Error>> {
    let settings = Settings::load()?;
    let store = Store::open()?;
    let session = Session::load(&store, settings);
    Ok((store, session))
}

/// Persist an outcome and report its alarm tokens on stderr.
pub fn finish(store: &Store, session: &Session, outcome: &EffectOutcome) -> CliResult {
    session.persist(store, outcome)?;
    for sound in &outcome.sounds {
        eprintln!("alarm: {sound}");
    }
    Ok(())
}

pub fn print_json<T: serde::Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
