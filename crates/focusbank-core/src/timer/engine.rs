//! Break-bank timer implementation.
//!
//! The timer is a wall-clock-based state machine. It does not use internal
//! threads - the caller drives it by invoking `tick(now)` once per second
//! and executes the effects each command returns.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running(work|break) -> Grace -> Running(next mode)
//!             |                             ^
//!             v                             |
//!         AllPaused ---- resume ------------+
//!             |
//!         end_session -> SummaryShown -> Idle
//! ```
//!
//! At most one of Running/Grace/AllPaused is live at a time, so the
//! per-second accumulators (`work_time`, `break_time`, grace total, pause
//! total) are mutually exclusive.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::all_pause::AllPauseState;
use super::grace::{GraceChoice, GraceContext, GraceState};
use crate::events::Effect;
use crate::log::{LogEntry, LogKind};
use crate::storage::{Bucket, Settings};

/// Which clock the timer is currently charging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Work,
    Break,
}

impl Mode {
    pub fn other(self) -> Mode {
        match self {
            Mode::Work => Mode::Break,
            Mode::Break => Mode::Work,
        }
    }
}

/// Coarse timer phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// No interval running.
    Idle,
    /// The active mode's clock is moving.
    Running,
    /// A boundary was crossed; elapsed time awaits attribution.
    Grace,
    /// Both clocks frozen by explicit user action.
    AllPaused,
    /// The session ended; summary on screen, waiting for close.
    SummaryShown,
}

/// Read-only view of the timer for frontends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub phase: Phase,
    pub active_mode: Mode,
    /// Seconds remaining in the current work interval.
    pub work_secs: i64,
    /// Bank balance in seconds; negative is break debt.
    pub bank_secs: i64,
    pub in_debt: bool,
    pub pomodoro_count: u32,
    pub grace: Option<GraceSnapshot>,
    pub all_pause: Option<AllPauseSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraceSnapshot {
    pub context: GraceContext,
    pub total_secs: i64,
    pub options: Vec<GraceChoice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllPauseSnapshot {
    pub reason: Option<String>,
    pub total_secs: i64,
}

/// Core break-bank timer.
///
/// Operates on wall-clock deltas -- no internal thread. Every command takes
/// the current instant explicitly, so tests never race a hidden clock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankTimer {
    settings: Settings,
    phase: Phase,
    active_mode: Mode,
    /// Seconds remaining in the current work interval, floored at 0.
    work_time: i64,
    /// Bank balance in seconds. May go negative: break debt.
    break_time: i64,
    /// Completed work units this session. Manually adjustable, clamped >= 0.
    pomodoro_count: u32,
    #[serde(default)]
    grace: Option<GraceState>,
    #[serde(default)]
    all_pause: Option<AllPauseState>,
    /// Last instant consumed by `tick`. Sub-second remainders carry over.
    #[serde(default)]
    last_tick: Option<DateTime<Utc>>,
    /// When the current work interval's countdown began.
    #[serde(default)]
    interval_started_at: Option<DateTime<Utc>>,
    /// When the active mode last changed; closes break log spans.
    #[serde(default)]
    mode_entered_at: Option<DateTime<Utc>>,
}

impl BankTimer {
    /// Create an idle timer from settings. The bank starts empty.
    pub fn new(settings: Settings) -> Self {
        let work_time = settings.work_duration;
        Self {
            settings,
            phase: Phase::Idle,
            active_mode: Mode::Work,
            work_time,
            break_time: 0,
            pomodoro_count: 0,
            grace: None,
            all_pause: None,
            last_tick: None,
            interval_started_at: None,
            mode_entered_at: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn active_mode(&self) -> Mode {
        self.active_mode
    }

    pub fn work_secs(&self) -> i64 {
        self.work_time
    }

    /// Bank balance in seconds. Negative means debt.
    pub fn bank_secs(&self) -> i64 {
        self.break_time
    }

    pub fn pomodoro_count(&self) -> u32 {
        self.pomodoro_count
    }

    pub fn is_started(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn grace_state(&self) -> Option<&GraceState> {
        self.grace.as_ref()
    }

    pub fn all_pause_state(&self) -> Option<&AllPauseState> {
        self.all_pause.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Build a full state snapshot for frontends.
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            phase: self.phase,
            active_mode: self.active_mode,
            work_secs: self.work_time,
            bank_secs: self.break_time,
            in_debt: self.break_time < 0,
            pomodoro_count: self.pomodoro_count,
            grace: self.grace.as_ref().map(|g| GraceSnapshot {
                context: g.context,
                total_secs: g.total_secs,
                options: g.options(),
            }),
            all_pause: self.all_pause.as_ref().map(|p| AllPauseSnapshot {
                reason: p.reason.clone(),
                total_secs: p.total_secs,
            }),
        }
    }

    /// Swap in new settings. An idle work clock picks up the new duration.
    pub fn set_settings(&mut self, settings: Settings) {
        if self.phase == Phase::Idle {
            self.work_time = settings.work_duration;
        }
        self.settings = settings;
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Foreground the named mode. From Idle this also starts that mode's
    /// countdown; while running it behaves like a mode switch.
    pub fn activate_mode(&mut self, mode: Mode, now: DateTime<Utc>) -> Vec<Effect> {
        match self.phase {
            Phase::Idle => {
                self.phase = Phase::Running;
                self.active_mode = mode;
                self.last_tick = Some(now);
                self.mode_entered_at = Some(now);
                if mode == Mode::Work {
                    if self.work_time <= 0 {
                        self.work_time = self.settings.work_duration;
                    }
                    self.interval_started_at = Some(now);
                }
                vec![Effect::Persist { bucket: Bucket::Engine }]
            }
            Phase::Running if mode != self.active_mode => self.switch_mode(now),
            _ => Vec::new(),
        }
    }

    /// Toggle the active mode without stopping the clock. Manual override,
    /// independent of interval completion.
    pub fn switch_mode(&mut self, now: DateTime<Utc>) -> Vec<Effect> {
        match self.phase {
            Phase::Idle => {
                self.active_mode = self.active_mode.other();
                vec![Effect::Persist { bucket: Bucket::Engine }]
            }
            Phase::Running => {
                let mut effects = Vec::new();
                if self.active_mode == Mode::Break {
                    effects.extend(self.close_break_span(now));
                }
                self.active_mode = self.active_mode.other();
                self.mode_entered_at = Some(now);
                if self.active_mode == Mode::Work && self.work_time <= 0 {
                    self.work_time = self.settings.work_duration;
                    self.interval_started_at = Some(now);
                }
                effects.push(Effect::Persist { bucket: Bucket::Engine });
                effects
            }
            _ => Vec::new(),
        }
    }

    /// Reset the active mode's remaining time. Work resets to the configured
    /// duration or the supplied override. For break mode only an explicit
    /// override applies; a plain restart never moves the bank.
    pub fn restart_active(&mut self, custom_secs: Option<i64>, now: DateTime<Utc>) -> Vec<Effect> {
        if !matches!(self.phase, Phase::Idle | Phase::Running) {
            return Vec::new();
        }
        match self.active_mode {
            Mode::Work => {
                self.work_time = custom_secs.unwrap_or(self.settings.work_duration).max(0);
                if self.phase == Phase::Running {
                    self.interval_started_at = Some(now);
                }
            }
            Mode::Break => {
                if let Some(secs) = custom_secs {
                    self.break_time = secs;
                }
            }
        }
        vec![Effect::Persist { bucket: Bucket::Engine }]
    }

    /// Manual override of the completed-unit counter. Clamped >= 0.
    pub fn set_pomodoro_count(&mut self, count: i64) -> Vec<Effect> {
        self.pomodoro_count = count.max(0) as u32;
        vec![
            Effect::Persist { bucket: Bucket::Engine },
            Effect::Persist { bucket: Bucket::PomodoroCount },
        ]
    }

    /// Advance the live accumulator by the wall-clock time since the last
    /// tick. Call once per second.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<Effect> {
        let elapsed = self.consume_elapsed(now);
        if elapsed <= 0 {
            return Vec::new();
        }
        match self.phase {
            Phase::Running => self.tick_running(elapsed, now),
            Phase::Grace => {
                if let Some(ref mut grace) = self.grace {
                    grace.accumulate(elapsed);
                }
                vec![Effect::Persist { bucket: Bucket::Engine }]
            }
            Phase::AllPaused => {
                if let Some(ref mut pause) = self.all_pause {
                    pause.accumulate(elapsed);
                }
                vec![Effect::Persist { bucket: Bucket::Engine }]
            }
            Phase::Idle | Phase::SummaryShown => Vec::new(),
        }
    }

    /// Resolve the open grace window. Not open, or an attribution choice
    /// before the 30-second threshold: no-op.
    pub fn resolve_grace(&mut self, choice: GraceChoice, now: DateTime<Utc>) -> Vec<Effect> {
        if self.phase != Phase::Grace {
            return Vec::new();
        }
        let Some(grace) = self.grace.as_ref() else {
            return Vec::new();
        };
        let Some(resolution) = grace.resolve(choice) else {
            return Vec::new();
        };

        let entry = LogEntry {
            kind: LogKind::Grace,
            start: grace.opened_at,
            end: now,
            duration_secs: resolution.total_secs,
            reason: resolution.attribution.map(|a| match a {
                super::bank::Attribution::Working => "was-working".to_string(),
                super::bank::Attribution::Resting => "was-resting".to_string(),
            }),
            task: None,
            color: None,
        };

        self.break_time += resolution.bank_delta;
        self.grace = None;
        self.enter_running(resolution.next_mode, now);

        vec![
            Effect::AppendLog { entry },
            Effect::Persist { bucket: Bucket::Engine },
            Effect::Persist { bucket: Bucket::Log },
        ]
    }

    /// Freeze both clocks. Only a running timer can be paused. The allpause
    /// log entry is appended now with the reason; its end is finalized on
    /// resume.
    pub fn pause_all(&mut self, reason: Option<String>, now: DateTime<Utc>) -> Vec<Effect> {
        if self.phase != Phase::Running {
            return Vec::new();
        }
        let mut effects = Vec::new();
        if self.active_mode == Mode::Break {
            effects.extend(self.close_break_span(now));
        }
        let entry = match &reason {
            Some(r) => LogEntry::new(LogKind::AllPause, now, now).with_reason(r.clone()),
            None => LogEntry::new(LogKind::AllPause, now, now),
        };
        self.all_pause = Some(AllPauseState::open(reason, now));
        self.phase = Phase::AllPaused;
        effects.push(Effect::AppendLog { entry });
        effects.push(Effect::Persist { bucket: Bucket::Engine });
        effects.push(Effect::Persist { bucket: Bucket::Log });
        effects
    }

    /// Resume from all-pause into the given mode, applying the caller's
    /// bank adjustment (earn/spend over the pause window, or 0 for a
    /// neutral resume).
    pub fn resume_all(
        &mut self,
        mode: Mode,
        bank_adjustment: i64,
        now: DateTime<Utc>,
    ) -> Vec<Effect> {
        if self.phase != Phase::AllPaused {
            return Vec::new();
        }
        self.break_time += bank_adjustment;
        self.all_pause = None;
        self.enter_running(mode, now);
        vec![
            Effect::FinalizeAllPause { end: now },
            Effect::Persist { bucket: Bucket::Engine },
            Effect::Persist { bucket: Bucket::Log },
        ]
    }

    /// Resume from all-pause into a grace window instead of attributing the
    /// pause immediately. The pause total seeds the window, so the whole
    /// ambiguous span is settled by one grace resolution.
    pub fn resume_into_grace(&mut self, now: DateTime<Utc>) -> Vec<Effect> {
        if self.phase != Phase::AllPaused {
            return Vec::new();
        }
        let total = self.all_pause.as_ref().map(|p| p.total_secs).unwrap_or(0);
        self.all_pause = None;

        let mut grace = GraceState::open(GraceContext::AfterBreak, now);
        grace.accumulate(total);
        self.grace = Some(grace);
        self.phase = Phase::Grace;
        self.last_tick = Some(now);

        vec![
            Effect::FinalizeAllPause { end: now },
            Effect::Persist { bucket: Bucket::Engine },
            Effect::Persist { bucket: Bucket::Log },
        ]
    }

    /// Terminate the whole work session and show the summary. Distinct from
    /// pausing; valid from any non-terminal phase.
    pub fn end_session(&mut self, now: DateTime<Utc>) -> Vec<Effect> {
        if self.phase == Phase::SummaryShown {
            return Vec::new();
        }
        let mut effects = Vec::new();
        if self.phase == Phase::Running && self.active_mode == Mode::Break {
            effects.extend(self.close_break_span(now));
        }
        if self.phase == Phase::AllPaused {
            effects.push(Effect::FinalizeAllPause { end: now });
        }
        self.grace = None;
        self.all_pause = None;
        self.last_tick = None;
        self.phase = Phase::SummaryShown;
        effects.push(Effect::SessionEnded);
        effects.push(Effect::Persist { bucket: Bucket::Engine });
        effects.push(Effect::Persist { bucket: Bucket::Log });
        effects
    }

    /// Close the summary and return to Idle, ready for a new session. The
    /// bank balance survives: debt is repaid by future work sessions.
    pub fn close_summary(&mut self) -> Vec<Effect> {
        if self.phase != Phase::SummaryShown {
            return Vec::new();
        }
        self.phase = Phase::Idle;
        self.active_mode = Mode::Work;
        self.work_time = self.settings.work_duration;
        self.pomodoro_count = 0;
        self.interval_started_at = None;
        self.mode_entered_at = None;
        vec![
            Effect::Persist { bucket: Bucket::Engine },
            Effect::Persist { bucket: Bucket::PomodoroCount },
        ]
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Whole seconds since the last tick. The remainder under one second
    /// stays banked in `last_tick` so long sessions don't drift.
    fn consume_elapsed(&mut self, now: DateTime<Utc>) -> i64 {
        match self.last_tick {
            None => {
                self.last_tick = Some(now);
                0
            }
            Some(last) => {
                let elapsed = (now - last).num_seconds();
                if elapsed > 0 {
                    self.last_tick = Some(last + Duration::seconds(elapsed));
                }
                elapsed.max(0)
            }
        }
    }

    fn tick_running(&mut self, elapsed: i64, now: DateTime<Utc>) -> Vec<Effect> {
        match self.active_mode {
            Mode::Work => {
                self.work_time -= elapsed;
                if self.work_time > 0 {
                    return vec![Effect::Persist { bucket: Bucket::Engine }];
                }
                // Work interval completed: log it, count it, open grace.
                // Any overshoot past zero already belongs to the window.
                let overshoot = -self.work_time;
                self.work_time = 0;
                self.pomodoro_count += 1;

                let start = self.interval_started_at.unwrap_or(now);
                let entry = LogEntry::new(LogKind::Work, start, now);
                self.interval_started_at = None;

                let mut grace = GraceState::open(GraceContext::AfterWork, now);
                grace.accumulate(overshoot);
                self.grace = Some(grace);
                self.phase = Phase::Grace;

                vec![
                    Effect::AppendLog { entry },
                    Effect::WorkUnitCompleted,
                    Effect::Notify {
                        sound: self.settings.alarm_work.clone(),
                    },
                    Effect::Persist { bucket: Bucket::Engine },
                    Effect::Persist { bucket: Bucket::Log },
                    Effect::Persist { bucket: Bucket::PomodoroCount },
                ]
            }
            Mode::Break => {
                // The bank drains 1:1 and may cross into debt. Depletion is
                // a display signal, not a boundary: breaks end by user
                // action, never by the balance hitting zero.
                self.break_time -= elapsed;
                vec![Effect::Persist { bucket: Bucket::Engine }]
            }
        }
    }

    fn enter_running(&mut self, mode: Mode, now: DateTime<Utc>) {
        self.phase = Phase::Running;
        self.active_mode = mode;
        self.last_tick = Some(now);
        self.mode_entered_at = Some(now);
        if mode == Mode::Work && self.work_time <= 0 {
            self.work_time = self.settings.work_duration;
        }
        if mode == Mode::Work {
            self.interval_started_at = Some(now);
        }
    }

    /// Close the running break span with a log entry.
    fn close_break_span(&mut self, now: DateTime<Utc>) -> Vec<Effect> {
        let Some(start) = self.mode_entered_at.take() else {
            return Vec::new();
        };
        if (now - start).num_seconds() <= 0 {
            return Vec::new();
        }
        vec![Effect::AppendLog {
            entry: LogEntry::new(LogKind::Break, start, now),
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::grace::ATTRIBUTION_THRESHOLD_SECS;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    fn running_work_timer() -> BankTimer {
        let mut timer = BankTimer::new(Settings::default());
        timer.activate_mode(Mode::Work, at(0));
        timer
    }

    fn has_log(effects: &[Effect], kind: LogKind) -> bool {
        effects.iter().any(
            |e| matches!(e, Effect::AppendLog { entry } if entry.kind == kind),
        )
    }

    #[test]
    fn activate_from_idle_starts_countdown() {
        let mut timer = BankTimer::new(Settings::default());
        assert_eq!(timer.phase(), Phase::Idle);
        timer.activate_mode(Mode::Work, at(0));
        assert_eq!(timer.phase(), Phase::Running);
        assert_eq!(timer.work_secs(), 25 * 60);
    }

    #[test]
    fn tick_decrements_work_time() {
        let mut timer = running_work_timer();
        timer.tick(at(10));
        assert_eq!(timer.work_secs(), 25 * 60 - 10);
    }

    #[test]
    fn work_completion_opens_grace_and_counts() {
        let mut timer = running_work_timer();
        let effects = timer.tick(at(25 * 60));
        assert_eq!(timer.phase(), Phase::Grace);
        assert_eq!(timer.pomodoro_count(), 1);
        assert_eq!(
            timer.grace_state().unwrap().context,
            GraceContext::AfterWork
        );
        assert!(has_log(&effects, LogKind::Work));
        assert!(effects.iter().any(|e| matches!(e, Effect::Notify { .. })));
        assert!(effects
            .iter()
            .any(|e| matches!(e, Effect::WorkUnitCompleted)));
    }

    #[test]
    fn work_overshoot_seeds_grace_window() {
        let mut timer = running_work_timer();
        // One late tick: 25 min interval observed 40 s past its end.
        timer.tick(at(25 * 60 + 40));
        assert_eq!(timer.grace_state().unwrap().total_secs, 40);
    }

    #[test]
    fn break_drains_bank_into_debt() {
        let mut timer = BankTimer::new(Settings::default());
        timer.activate_mode(Mode::Break, at(0));
        timer.tick(at(100));
        assert_eq!(timer.bank_secs(), -100);
        // Still running: depletion is not a boundary.
        assert_eq!(timer.phase(), Phase::Running);
    }

    #[test]
    fn switch_mode_keeps_clock_running() {
        let mut timer = running_work_timer();
        timer.tick(at(60));
        timer.switch_mode(at(60));
        assert_eq!(timer.active_mode(), Mode::Break);
        assert_eq!(timer.phase(), Phase::Running);
        // Work remaining is frozen while the bank drains.
        timer.tick(at(120));
        assert_eq!(timer.work_secs(), 25 * 60 - 60);
        assert_eq!(timer.bank_secs(), -60);
    }

    #[test]
    fn leaving_break_logs_the_span() {
        let mut timer = BankTimer::new(Settings::default());
        timer.activate_mode(Mode::Break, at(0));
        timer.tick(at(300));
        let effects = timer.switch_mode(at(300));
        assert!(has_log(&effects, LogKind::Break));
    }

    #[test]
    fn grace_next_mode_choice_keeps_bank() {
        let mut timer = running_work_timer();
        timer.tick(at(25 * 60));
        timer.tick(at(25 * 60 + 10));
        let bank = timer.bank_secs();
        timer.resolve_grace(GraceChoice::ContinueWorking, at(25 * 60 + 10));
        assert_eq!(timer.bank_secs(), bank);
        assert_eq!(timer.phase(), Phase::Running);
        assert_eq!(timer.active_mode(), Mode::Work);
        assert_eq!(timer.work_secs(), 25 * 60);
    }

    #[test]
    fn grace_attribution_applies_policy() {
        let mut timer = running_work_timer();
        timer.tick(at(25 * 60));
        timer.tick(at(25 * 60 + 45));
        assert_eq!(timer.grace_state().unwrap().total_secs, 45);

        let effects = timer.resolve_grace(GraceChoice::WasWorking, at(25 * 60 + 45));
        assert_eq!(timer.bank_secs(), 9);
        assert!(has_log(&effects, LogKind::Grace));
    }

    #[test]
    fn grace_attribution_rejected_before_threshold() {
        let mut timer = running_work_timer();
        timer.tick(at(25 * 60));
        timer.tick(at(25 * 60 + ATTRIBUTION_THRESHOLD_SECS - 1));
        let effects = timer.resolve_grace(GraceChoice::WasResting, at(25 * 60 + 29));
        assert!(effects.is_empty());
        assert_eq!(timer.phase(), Phase::Grace);
    }

    #[test]
    fn resolve_without_open_grace_is_noop() {
        let mut timer = running_work_timer();
        let effects = timer.resolve_grace(GraceChoice::StartBreak, at(5));
        assert!(effects.is_empty());
        assert_eq!(timer.phase(), Phase::Running);
    }

    #[test]
    fn all_pause_freezes_both_clocks() {
        let mut timer = running_work_timer();
        timer.tick(at(60));
        timer.pause_all(Some("doorbell".into()), at(60));
        assert_eq!(timer.phase(), Phase::AllPaused);

        timer.tick(at(180));
        assert_eq!(timer.work_secs(), 25 * 60 - 60);
        assert_eq!(timer.bank_secs(), 0);
        assert_eq!(timer.all_pause_state().unwrap().total_secs, 120);
    }

    #[test]
    fn resume_applies_adjustment_and_mode() {
        let mut timer = running_work_timer();
        timer.tick(at(60));
        timer.pause_all(None, at(60));
        timer.tick(at(160));

        let effects = timer.resume_all(Mode::Work, 20, at(160));
        assert_eq!(timer.phase(), Phase::Running);
        assert_eq!(timer.active_mode(), Mode::Work);
        assert_eq!(timer.bank_secs(), 20);
        assert!(effects
            .iter()
            .any(|e| matches!(e, Effect::FinalizeAllPause { .. })));
    }

    #[test]
    fn resume_into_grace_carries_pause_total() {
        let mut timer = running_work_timer();
        timer.pause_all(None, at(0));
        timer.tick(at(90));
        timer.resume_into_grace(at(90));
        assert_eq!(timer.phase(), Phase::Grace);
        let grace = timer.grace_state().unwrap();
        assert_eq!(grace.context, GraceContext::AfterBreak);
        assert_eq!(grace.total_secs, 90);
        // 90 s >= threshold: attribution available immediately.
        assert_eq!(grace.options().len(), 4);
    }

    #[test]
    fn pause_outside_running_is_noop() {
        let mut timer = BankTimer::new(Settings::default());
        assert!(timer.pause_all(None, at(0)).is_empty());
        let mut timer = running_work_timer();
        timer.tick(at(25 * 60));
        assert!(timer.pause_all(None, at(25 * 60 + 5)).is_empty());
    }

    #[test]
    fn end_session_then_close_resets_counters_keeps_bank() {
        let mut timer = running_work_timer();
        timer.tick(at(25 * 60));
        timer.tick(at(25 * 60 + 45));
        timer.resolve_grace(GraceChoice::WasResting, at(25 * 60 + 45));
        assert_eq!(timer.bank_secs(), -45);

        let effects = timer.end_session(at(26 * 60));
        assert_eq!(timer.phase(), Phase::SummaryShown);
        assert!(effects.iter().any(|e| matches!(e, Effect::SessionEnded)));

        timer.close_summary();
        assert_eq!(timer.phase(), Phase::Idle);
        assert_eq!(timer.pomodoro_count(), 0);
        assert_eq!(timer.work_secs(), 25 * 60);
        // Debt survives the session boundary.
        assert_eq!(timer.bank_secs(), -45);
    }

    #[test]
    fn pomodoro_override_clamps_negative() {
        let mut timer = BankTimer::new(Settings::default());
        timer.set_pomodoro_count(-3);
        assert_eq!(timer.pomodoro_count(), 0);
        timer.set_pomodoro_count(7);
        assert_eq!(timer.pomodoro_count(), 7);
    }

    #[test]
    fn restart_active_work_resets_remaining() {
        let mut timer = running_work_timer();
        timer.tick(at(200));
        timer.restart_active(None, at(200));
        assert_eq!(timer.work_secs(), 25 * 60);

        timer.restart_active(Some(90), at(210));
        assert_eq!(timer.work_secs(), 90);
    }

    #[test]
    fn restart_active_break_needs_explicit_override() {
        let mut timer = BankTimer::new(Settings::default());
        timer.activate_mode(Mode::Break, at(0));
        timer.tick(at(30));
        assert_eq!(timer.bank_secs(), -30);

        // Plain restart never moves the bank.
        timer.restart_active(None, at(30));
        assert_eq!(timer.bank_secs(), -30);

        timer.restart_active(Some(300), at(30));
        assert_eq!(timer.bank_secs(), 300);
    }

    #[test]
    fn snapshot_reflects_state() {
        let mut timer = running_work_timer();
        timer.tick(at(60));
        let snap = timer.snapshot();
        assert_eq!(snap.phase, Phase::Running);
        assert_eq!(snap.work_secs, 25 * 60 - 60);
        assert!(!snap.in_debt);
        assert!(snap.grace.is_none());
    }

    #[test]
    fn engine_round_trips_through_json() {
        let mut timer = running_work_timer();
        timer.tick(at(90));
        let json = serde_json::to_string(&timer).unwrap();
        let restored: BankTimer = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.work_secs(), timer.work_secs());
        assert_eq!(restored.phase(), timer.phase());
    }
}
