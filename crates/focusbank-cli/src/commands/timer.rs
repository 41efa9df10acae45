use chrono::Utc;
use clap::Subcommand;
use focusbank_core::{Attribution, GraceChoice, Mode};

use super::{finish, load_session, print_json, CliResult};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Tick the timer and print its state as JSON
    Status,
    /// Activate a mode (starts it when the timer is idle)
    Activate {
        /// "work" or "break"
        mode: String,
    },
    /// Toggle the active mode without stopping the clock
    Switch,
    /// Reset the active mode's remaining time
    Restart {
        /// Override in seconds instead of the configured duration
        #[arg(long)]
        secs: Option<i64>,
    },
    /// Resolve the open grace window
    Grace {
        /// continue-working | start-break | was-working | was-resting
        choice: String,
    },
    /// Freeze both clocks
    Pause {
        /// Free-text reason recorded in the log
        #[arg(long)]
        reason: Option<String>,
    },
    /// Resume from all-pause into the given mode
    Resume {
        /// "work" or "break"
        mode: String,
        /// Attribute the pause window: "working" or "resting".
        /// Omit for a neutral resume.
        #[arg(long)]
        attribute: Option<String>,
    },
    /// Resume from all-pause into a grace window instead
    ResumeGrace,
    /// Override the completed-unit counter
    SetCount { count: i64 },
    /// End the work session and print the summary
    End,
    /// Close the summary and return to idle
    CloseSummary,
}

fn parse_mode(value: &str) -> Result<Mode, String> {
    match value {
        "work" => Ok(Mode::Work),
        "break" => Ok(Mode::Break),
        other => Err(format!("unknown mode '{other}', expected work or break")),
    }
}

fn parse_choice(value: &str) -> Result<GraceChoice, String> {
    match value {
        "continue-working" => Ok(GraceChoice::ContinueWorking),
        "start-break" => Ok(GraceChoice::StartBreak),
        "was-working" => Ok(GraceChoice::WasWorking),
        "was-resting" => Ok(GraceChoice::WasResting),
        other => Err(format!("unknown grace choice '{other}'")),
    }
}

fn parse_attribution(value: &str) -> Result<Attribution, String> {
    match value {
        "working" => Ok(Attribution::Working),
        "resting" => Ok(Attribution::Resting),
        other => Err(format!("unknown attribution '{other}'")),
    }
}

pub fn run(action: TimerAction) -> CliResult {
    let (store, mut session) = load_session()?;
    let now = Utc::now();

    let outcome = match action {
        TimerAction::Status => session.tick(now),
        TimerAction::Activate { mode } => session.activate_mode(parse_mode(&mode)?, now),
        TimerAction::Switch => session.switch_mode(now),
        TimerAction::Restart { secs } => session.restart_active(secs, now),
        TimerAction::Grace { choice } => {
            let mut outcome = session.tick(now);
            let resolved = session.resolve_grace(parse_choice(&choice)?, now);
            if resolved.dirty.is_empty() {
                eprintln!("grace: choice not currently available");
            }
            outcome.dirty.extend(resolved.dirty);
            outcome.sounds.extend(resolved.sounds);
            outcome
        }
        TimerAction::Pause { reason } => session.pause_all(reason, now),
        TimerAction::Resume { mode, attribute } => {
            let attribution = attribute.as_deref().map(parse_attribution).transpose()?;
            let mut outcome = session.tick(now);
            let resumed = session.resume_all(parse_mode(&mode)?, attribution, now);
            outcome.dirty.extend(resumed.dirty);
            outcome
        }
        TimerAction::ResumeGrace => {
            let mut outcome = session.tick(now);
            let resumed = session.resume_into_grace(now);
            outcome.dirty.extend(resumed.dirty);
            outcome
        }
        TimerAction::SetCount { count } => session.set_pomodoro_count(count),
        TimerAction::End => {
            let mut outcome = session.tick(now);
            let ended = session.end_session(now);
            outcome.dirty.extend(ended.dirty);
            outcome.session_ended = ended.session_ended;
            outcome
        }
        TimerAction::CloseSummary => session.close_summary(),
    };

    if outcome.session_ended {
        if let Some(stats) = session.summary() {
            print_json(stats)?;
        }
    } else {
        print_json(&session.timer.snapshot())?;
    }
    finish(&store, &session, &outcome)
}
