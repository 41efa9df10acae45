use chrono::Utc;
use clap::Subcommand;
use focusbank_core::Bucket;

use super::{finish, load_session, print_json, CliResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task to the end of the queue
    Add {
        name: String,
        /// Estimated work units
        #[arg(long)]
        estimate: Option<i64>,
        /// Color tag
        #[arg(long)]
        color: Option<String>,
        /// Category reference
        #[arg(long)]
        category: Option<String>,
    },
    /// Add a subtask under a task
    Sub { task_id: String, name: String },
    /// List the queue as JSON
    List,
    /// Print the flattened work units
    Units,
    /// Set the done flag
    Check {
        id: String,
        /// Uncheck instead
        #[arg(long)]
        undo: bool,
    },
    /// Edit the estimate. Non-numeric input keeps the previous value.
    Estimate { id: String, value: String },
    /// Edit the completed counter (manual override; may exceed estimate)
    Completed { id: String, value: String },
    /// Divide a task into two, redistributing the estimate
    Split { id: String, first_estimate: u32 },
    /// Move a task or subtask to a new position in its sibling list
    Move { id: String, index: usize },
    /// Remove a task (and its subtasks) or a single subtask
    Remove { id: String },
    /// Rename a task or subtask
    Rename { id: String, name: String },
}

pub fn run(action: TaskAction) -> CliResult {
    let (store, mut session) = load_session()?;
    let now = Utc::now();
    let mut dirty = vec![Bucket::Tasks];

    match action {
        TaskAction::Add {
            name,
            estimate,
            color,
            category,
        } => {
            let id = session.tasks.add(name).id.clone();
            if let Some(est) = estimate {
                session.tasks.set_estimate(&id, est)?;
            }
            if color.is_some() {
                session.tasks.set_color(&id, color)?;
            }
            if category.is_some() {
                session.tasks.set_category(&id, category)?;
            }
            let task = session.tasks.get(&id).ok_or("task not found after insert")?;
            print_json(task)?;
        }
        TaskAction::Sub { task_id, name } => {
            let sub = session.tasks.add_subtask(&task_id, name)?;
            print_json(sub)?;
        }
        TaskAction::List => {
            print_json(&session.tasks.tasks())?;
            dirty.clear();
        }
        TaskAction::Units => {
            print_json(&session.tasks.work_units())?;
            dirty.clear();
        }
        TaskAction::Check { id, undo } => {
            let outcome = session.set_task_checked(&id, !undo, now)?;
            dirty = outcome.dirty;
        }
        TaskAction::Estimate { id, value } => match value.parse::<i64>() {
            Ok(est) => session.tasks.set_estimate(&id, est)?,
            Err(_) => {
                // Ignored edit: previous value retained.
                eprintln!("estimate: '{value}' is not a number, keeping previous value");
                dirty.clear();
            }
        },
        TaskAction::Completed { id, value } => match value.parse::<i64>() {
            Ok(completed) => session.tasks.set_completed(&id, completed)?,
            Err(_) => {
                eprintln!("completed: '{value}' is not a number, keeping previous value");
                dirty.clear();
            }
        },
        TaskAction::Split { id, first_estimate } => {
            let second = session.tasks.split(&id, first_estimate)?;
            print_json(second)?;
        }
        TaskAction::Move { id, index } => session.tasks.reorder(&id, index)?,
        TaskAction::Remove { id } => session.tasks.remove(&id)?,
        TaskAction::Rename { id, name } => session.tasks.rename(&id, name)?,
    }

    let outcome = focusbank_core::EffectOutcome {
        dirty,
        ..Default::default()
    };
    finish(&store, &session, &outcome)
}
