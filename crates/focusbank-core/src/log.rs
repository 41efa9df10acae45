//! Append-only session log and derived statistics.
//!
//! Every completed interval, pause window, grace window, and task completion
//! is recorded as a [`LogEntry`]. The log is cleared only by explicit user
//! reset; ending a session keeps history intact.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::TaskQueue;

/// Kind of logged interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogKind {
    Work,
    Break,
    AllPause,
    Grace,
    TaskComplete,
}

/// One immutable record of a completed interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub kind: LogKind,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Interval length in seconds.
    pub duration_secs: i64,
    /// Free-text reason (all-pause) or chosen attribution (grace).
    #[serde(default)]
    pub reason: Option<String>,
    /// Name of the task the interval was spent on, when known.
    #[serde(default)]
    pub task: Option<String>,
    /// Color tag of that task, for rendering.
    #[serde(default)]
    pub color: Option<String>,
}

impl LogEntry {
    pub fn new(kind: LogKind, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            kind,
            start,
            end,
            duration_secs: (end - start).num_seconds().max(0),
            reason: None,
            task: None,
            color: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_task(mut self, task: impl Into<String>, color: Option<String>) -> Self {
        self.task = Some(task.into());
        self.color = color;
        self
    }
}

/// Append-only record of session activity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionLog {
    entries: Vec<LogEntry>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    /// Fill in the end/duration of the most recent open all-pause entry.
    ///
    /// The entry is appended when the pause is confirmed (carrying the
    /// reason) and finalized here on resume. This is the only amendment the
    /// log permits.
    pub fn finalize_all_pause(&mut self, end: DateTime<Utc>) {
        if let Some(entry) = self
            .entries
            .iter_mut()
            .rev()
            .find(|e| e.kind == LogKind::AllPause)
        {
            entry.end = end;
            entry.duration_secs = (end - entry.start).num_seconds().max(0);
        }
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Explicit user reset. Nothing else removes entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Summary computed when a session ends.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionStats {
    pub work_secs: i64,
    pub break_secs: i64,
    pub pause_secs: i64,
    pub completed_tasks: usize,
    pub pomodoros: u32,
    /// Focus minutes per task category. Tasks without a category are grouped
    /// under "uncategorized".
    pub category_minutes: HashMap<String, i64>,
}

impl SessionStats {
    pub fn compute(log: &SessionLog, queue: &TaskQueue, pomodoros: u32) -> Self {
        let mut stats = SessionStats {
            pomodoros,
            ..Default::default()
        };

        for entry in log.entries() {
            match entry.kind {
                LogKind::Work => {
                    stats.work_secs += entry.duration_secs;
                    let category = entry
                        .task
                        .as_deref()
                        .and_then(|name| queue.category_of(name))
                        .unwrap_or_else(|| "uncategorized".to_string());
                    *stats.category_minutes.entry(category).or_insert(0) +=
                        entry.duration_secs / 60;
                }
                LogKind::Break => stats.break_secs += entry.duration_secs,
                LogKind::AllPause => stats.pause_secs += entry.duration_secs,
                LogKind::TaskComplete => stats.completed_tasks += 1,
                LogKind::Grace => {}
            }
        }
        stats
    }
}
