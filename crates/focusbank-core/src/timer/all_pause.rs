//! All-pause: full suspension of both clocks.
//!
//! Independent of the grace protocol. While paused, neither `work_time` nor
//! the bank moves; a separate counter accumulates the elapsed real time. On
//! resume the caller decides what that time was worth (via the bank policy,
//! or nothing) and which mode to return to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Open all-pause window. Owned by the timer; at most one at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllPauseState {
    /// When the pause was confirmed.
    pub paused_at: DateTime<Utc>,
    /// Free-text reason supplied at confirmation.
    pub reason: Option<String>,
    /// Real-time seconds accumulated since the pause began.
    pub total_secs: i64,
}

impl AllPauseState {
    pub fn open(reason: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            paused_at: now,
            reason,
            total_secs: 0,
        }
    }

    /// Accumulate elapsed seconds. Driven by the engine's tick.
    pub fn accumulate(&mut self, elapsed_secs: i64) {
        self.total_secs += elapsed_secs.max(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_elapsed_time() {
        let now = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
        let mut pause = AllPauseState::open(Some("lunch ran long".into()), now);
        pause.accumulate(60);
        pause.accumulate(60);
        assert_eq!(pause.total_secs, 120);
        assert_eq!(pause.reason.as_deref(), Some("lunch ran long"));
    }

    #[test]
    fn negative_elapsed_is_ignored() {
        let now = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
        let mut pause = AllPauseState::open(None, now);
        pause.accumulate(-5);
        assert_eq!(pause.total_secs, 0);
    }
}
