//! Session controller: the one owner of cross-component state.
//!
//! Holds settings, the task queue, the timer, the log, and the day plan,
//! and routes commands to the timer while executing the effects it returns.
//! Components never reach for a global; whatever needs state gets it from
//! here by reference.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::ValidationError;
use crate::events::Effect;
use crate::log::{LogEntry, LogKind, SessionLog, SessionStats};
use crate::schedule::{self, SchedulePlan, Timeline, TimelineInput};
use crate::storage::{Bucket, Settings, Store};
use crate::task::{TaskQueue, UnitOwner};
use crate::timer::{bank_delta, Attribution, BankTimer, GraceChoice, Mode};

/// What executing a command's effects produced: sounds to play and buckets
/// to persist.
#[derive(Debug, Clone, Default)]
pub struct EffectOutcome {
    pub sounds: Vec<String>,
    pub dirty: Vec<Bucket>,
    pub session_ended: bool,
}

/// All state for one user's focus session.
pub struct Session {
    pub settings: Settings,
    pub tasks: TaskQueue,
    pub timer: BankTimer,
    pub log: SessionLog,
    pub plan: SchedulePlan,
    summary: Option<SessionStats>,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        let timer = BankTimer::new(settings.clone());
        Self {
            settings,
            tasks: TaskQueue::new(),
            timer,
            log: SessionLog::new(),
            plan: SchedulePlan::default(),
            summary: None,
        }
    }

    /// Rebuild a session from the store's buckets. Each bucket falls back
    /// to its default independently; a stored engine snapshot picks up the
    /// current settings.
    pub fn load(store: &Store, settings: Settings) -> Self {
        let mut timer = store
            .load_engine()
            .unwrap_or_else(|| BankTimer::new(settings.clone()));
        timer.set_settings(settings.clone());
        Self {
            settings,
            tasks: store.load_tasks(),
            timer,
            log: store.load_log(),
            plan: store.load_schedule(),
            summary: None,
        }
    }

    /// Write the outcome's dirty buckets back to the store.
    pub fn persist(&self, store: &Store, outcome: &EffectOutcome) -> Result<(), crate::error::StoreError> {
        let mut seen = Vec::new();
        for bucket in &outcome.dirty {
            if seen.contains(bucket) {
                continue;
            }
            seen.push(*bucket);
            match bucket {
                Bucket::Tasks => store.save(Bucket::Tasks, &self.tasks)?,
                Bucket::Log => store.save(Bucket::Log, &self.log)?,
                Bucket::PomodoroCount => {
                    store.save(Bucket::PomodoroCount, &self.timer.pomodoro_count())?
                }
                Bucket::Schedule => store.save(Bucket::Schedule, &self.plan)?,
                Bucket::Engine => store.save(Bucket::Engine, &self.timer)?,
            }
        }
        Ok(())
    }

    pub fn summary(&self) -> Option<&SessionStats> {
        self.summary.as_ref()
    }

    // ── Timer commands ───────────────────────────────────────────────

    pub fn tick(&mut self, now: DateTime<Utc>) -> EffectOutcome {
        let effects = self.timer.tick(now);
        self.apply(effects)
    }

    pub fn activate_mode(&mut self, mode: Mode, now: DateTime<Utc>) -> EffectOutcome {
        let effects = self.timer.activate_mode(mode, now);
        self.apply(effects)
    }

    pub fn switch_mode(&mut self, now: DateTime<Utc>) -> EffectOutcome {
        let effects = self.timer.switch_mode(now);
        self.apply(effects)
    }

    pub fn restart_active(&mut self, custom_secs: Option<i64>, now: DateTime<Utc>) -> EffectOutcome {
        let effects = self.timer.restart_active(custom_secs, now);
        self.apply(effects)
    }

    pub fn set_pomodoro_count(&mut self, count: i64) -> EffectOutcome {
        let effects = self.timer.set_pomodoro_count(count);
        self.apply(effects)
    }

    pub fn resolve_grace(&mut self, choice: GraceChoice, now: DateTime<Utc>) -> EffectOutcome {
        let effects = self.timer.resolve_grace(choice, now);
        self.apply(effects)
    }

    pub fn pause_all(&mut self, reason: Option<String>, now: DateTime<Utc>) -> EffectOutcome {
        let effects = self.timer.pause_all(reason, now);
        self.apply(effects)
    }

    /// Resume from all-pause. The pause window is attributed through the
    /// bank policy, or left unattributed for a neutral resume.
    pub fn resume_all(
        &mut self,
        mode: Mode,
        attribution: Option<Attribution>,
        now: DateTime<Utc>,
    ) -> EffectOutcome {
        let pause_total = self
            .timer
            .all_pause_state()
            .map(|p| p.total_secs)
            .unwrap_or(0);
        let adjustment = attribution
            .map(|a| bank_delta(a, pause_total))
            .unwrap_or(0);
        let effects = self.timer.resume_all(mode, adjustment, now);
        self.apply(effects)
    }

    pub fn resume_into_grace(&mut self, now: DateTime<Utc>) -> EffectOutcome {
        let effects = self.timer.resume_into_grace(now);
        self.apply(effects)
    }

    pub fn end_session(&mut self, now: DateTime<Utc>) -> EffectOutcome {
        let effects = self.timer.end_session(now);
        self.apply(effects)
    }

    /// Close the summary: back to Idle with task completion state reset for
    /// a new session. Log history stays.
    pub fn close_summary(&mut self) -> EffectOutcome {
        let effects = self.timer.close_summary();
        if effects.is_empty() {
            return EffectOutcome::default();
        }
        self.tasks.reset_for_new_session();
        self.summary = None;
        let mut outcome = self.apply(effects);
        outcome.dirty.push(Bucket::Tasks);
        outcome
    }

    // ── Task commands ────────────────────────────────────────────────

    /// Set a task's done flag, logging a task-complete entry when newly
    /// checked.
    pub fn set_task_checked(
        &mut self,
        id: &str,
        checked: bool,
        now: DateTime<Utc>,
    ) -> Result<EffectOutcome, ValidationError> {
        let owner = self.tasks.set_checked(id, checked)?;
        let mut outcome = EffectOutcome {
            dirty: vec![Bucket::Tasks],
            ..Default::default()
        };
        if let Some(UnitOwner { name, color, .. }) = owner {
            self.log
                .append(LogEntry::new(LogKind::TaskComplete, now, now).with_task(name, color));
            outcome.dirty.push(Bucket::Log);
        }
        Ok(outcome)
    }

    /// Explicit user reset of the log history.
    pub fn clear_log(&mut self) -> EffectOutcome {
        self.log.clear();
        EffectOutcome {
            dirty: vec![Bucket::Log],
            ..Default::default()
        }
    }

    // ── Projection ───────────────────────────────────────────────────

    /// Project the remaining queue onto the given day. Pure: same inputs,
    /// same timeline.
    pub fn timeline(&self, date: NaiveDate) -> Timeline {
        let units = self.tasks.work_units();
        schedule::generate(&TimelineInput {
            units: &units,
            settings: &self.settings,
            plan: &self.plan,
            date,
            pomodoro_count: self.timer.pomodoro_count(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn apply(&mut self, effects: Vec<Effect>) -> EffectOutcome {
        let mut outcome = EffectOutcome::default();

        // A completed work unit advances the owning task first, so the work
        // log entry can carry the task's name and color.
        let mut completed_owner: Option<UnitOwner> = None;
        if effects
            .iter()
            .any(|e| matches!(e, Effect::WorkUnitCompleted))
        {
            completed_owner = self.tasks.record_completed_unit();
            outcome.dirty.push(Bucket::Tasks);
        }

        for effect in effects {
            match effect {
                Effect::AppendLog { mut entry } => {
                    if entry.kind == LogKind::Work && entry.task.is_none() {
                        if let Some(owner) = &completed_owner {
                            entry.task = Some(owner.name.clone());
                            entry.color = owner.color.clone();
                        }
                    }
                    self.log.append(entry);
                }
                Effect::FinalizeAllPause { end } => self.log.finalize_all_pause(end),
                Effect::WorkUnitCompleted => {}
                Effect::Notify { sound } => {
                    if self.settings.notifications_enabled {
                        outcome.sounds.push(sound);
                    }
                }
                Effect::Persist { bucket } => outcome.dirty.push(bucket),
                Effect::SessionEnded => {
                    outcome.session_ended = true;
                    self.summary = Some(SessionStats::compute(
                        &self.log,
                        &self.tasks,
                        self.timer.pomodoro_count(),
                    ));
                }
            }
        }
        outcome
    }
}
