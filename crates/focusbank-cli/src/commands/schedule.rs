use chrono::{Local, NaiveDate};
use clap::Subcommand;
use focusbank_core::{Bucket, EffectOutcome, ScheduleBreak};

use super::{finish, load_session, print_json, CliResult};

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Set the schedule origin time of day
    SetStart { hour: u32, minute: u32 },
    /// Pin a break window
    AddBreak {
        /// Time of day, HH:MM
        start: String,
        /// Duration in minutes
        duration: i64,
        /// Label, e.g. "Lunch"
        #[arg(default_value = "Break")]
        label: String,
    },
    /// List pinned breaks
    Breaks,
    /// Remove a pinned break by id
    RemoveBreak { id: String },
    /// Project the remaining queue onto a day
    Timeline {
        /// Day to project onto (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

pub fn run(action: ScheduleAction) -> CliResult {
    let (store, mut session) = load_session()?;
    let mut dirty = vec![Bucket::Schedule];

    match action {
        ScheduleAction::SetStart { hour, minute } => {
            session.plan.set_start(hour, minute)?;
            print_json(&session.plan)?;
        }
        ScheduleAction::AddBreak {
            start,
            duration,
            label,
        } => {
            let pinned = ScheduleBreak::new(start, duration, label)?;
            print_json(&pinned)?;
            session.plan.add_break(pinned);
        }
        ScheduleAction::Breaks => {
            print_json(&session.plan.breaks)?;
            dirty.clear();
        }
        ScheduleAction::RemoveBreak { id } => {
            if !session.plan.remove_break(&id) {
                eprintln!("no pinned break with id {id}");
                dirty.clear();
            }
        }
        ScheduleAction::Timeline { date } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            print_json(&session.timeline(date))?;
            dirty.clear();
        }
    }

    let outcome = EffectOutcome {
        dirty,
        ..Default::default()
    };
    finish(&store, &session, &outcome)
}
