use clap::Subcommand;
use focusbank_core::SessionStats;

use super::{finish, load_session, print_json, CliResult};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Totals over the current log
    Session,
    /// Print the raw session log
    Log,
    /// Explicitly reset the log history
    ClearLog,
}

pub fn run(action: StatsAction) -> CliResult {
    let (store, mut session) = load_session()?;

    match action {
        StatsAction::Session => {
            let stats = SessionStats::compute(
                &session.log,
                &session.tasks,
                session.timer.pomodoro_count(),
            );
            print_json(&stats)
        }
        StatsAction::Log => print_json(&session.log.entries()),
        StatsAction::ClearLog => {
            let outcome = session.clear_log();
            println!("log cleared");
            finish(&store, &session, &outcome)
        }
    }
}
