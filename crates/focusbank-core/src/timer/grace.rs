//! Grace resolver - retroactive attribution of boundary time.
//!
//! When a work interval completes, the seconds that pass until the user acts
//! are of uncertain attribution: were they still working, or already
//! resting? The grace window accumulates that time and, once resolved,
//! applies the earn/spend policy retroactively.
//!
//! ## Offered choices
//!
//! - Under 30 accumulated seconds: only the two next-mode choices
//!   (continue working / start break), with zero bank adjustment.
//! - From 30 seconds on: additionally the two attribution choices
//!   ("I was working" / "I was resting"), which settle the *entire* window
//!   against the bank before advancing.
//!
//! There is no timeout. The window stays open until resolved through one of
//! its choices; the threshold only changes which choices are offered.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::bank::{self, Attribution};
use super::engine::Mode;

/// Accumulated seconds before attribution choices are offered.
pub const ATTRIBUTION_THRESHOLD_SECS: i64 = 30;

/// Which boundary opened the window. Always passed explicitly, never
/// inferred from surrounding state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraceContext {
    /// A work interval ran down to zero.
    AfterWork,
    /// Opened from the pause/resume flow.
    AfterBreak,
}

/// A way to close the grace window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GraceChoice {
    /// Advance to work, no bank adjustment.
    ContinueWorking,
    /// Advance to break, no bank adjustment.
    StartBreak,
    /// The whole window was focus time: bank += total / 5, advance to work.
    WasWorking,
    /// The whole window was rest: bank -= total, advance to break.
    WasResting,
}

impl GraceChoice {
    pub fn attribution(self) -> Option<Attribution> {
        match self {
            GraceChoice::WasWorking => Some(Attribution::Working),
            GraceChoice::WasResting => Some(Attribution::Resting),
            _ => None,
        }
    }
}

/// Outcome of resolving a grace window.
#[derive(Debug, Clone, Copy)]
pub struct GraceResolution {
    pub next_mode: Mode,
    pub bank_delta: i64,
    pub attribution: Option<Attribution>,
    pub total_secs: i64,
}

/// Open grace window. Owned by the timer; at most one at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraceState {
    pub context: GraceContext,
    /// When the boundary was crossed.
    pub opened_at: DateTime<Utc>,
    /// Real-time seconds accumulated since then.
    pub total_secs: i64,
}

impl GraceState {
    pub fn open(context: GraceContext, now: DateTime<Utc>) -> Self {
        Self {
            context,
            opened_at: now,
            total_secs: 0,
        }
    }

    /// Accumulate elapsed seconds. Driven by the engine's tick.
    pub fn accumulate(&mut self, elapsed_secs: i64) {
        self.total_secs += elapsed_secs.max(0);
    }

    /// Choices currently on offer.
    pub fn options(&self) -> Vec<GraceChoice> {
        let mut options = vec![GraceChoice::ContinueWorking, GraceChoice::StartBreak];
        if self.total_secs >= ATTRIBUTION_THRESHOLD_SECS {
            options.push(GraceChoice::WasWorking);
            options.push(GraceChoice::WasResting);
        }
        options
    }

    /// Resolve the window. Returns `None` if the choice is not currently
    /// offered (attribution before the threshold).
    pub fn resolve(&self, choice: GraceChoice) -> Option<GraceResolution> {
        if !self.options().contains(&choice) {
            return None;
        }
        let (next_mode, delta, attribution) = match choice {
            GraceChoice::ContinueWorking => (Mode::Work, 0, None),
            GraceChoice::StartBreak => (Mode::Break, 0, None),
            GraceChoice::WasWorking => (
                Mode::Work,
                bank::bank_delta(Attribution::Working, self.total_secs),
                Some(Attribution::Working),
            ),
            GraceChoice::WasResting => (
                Mode::Break,
                bank::bank_delta(Attribution::Resting, self.total_secs),
                Some(Attribution::Resting),
            ),
        };
        Some(GraceResolution {
            next_mode,
            bank_delta: delta,
            attribution,
            total_secs: self.total_secs,
        })
    }
}
