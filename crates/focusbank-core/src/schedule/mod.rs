//! Schedule types: the day plan and user-pinned break windows.
//!
//! Pinned breaks are user-authored fixed windows (lunch, standup) that the
//! timeline generator must route around. They are independent of the
//! generated short/long breaks.

pub mod timeline;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub use timeline::{generate, BlockKind, TimeBlock, Timeline, TimelineInput, PX_PER_MIN};

/// A user-pinned break window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleBreak {
    pub id: String,
    /// Time of day, "HH:MM".
    pub start_time: String,
    /// Window length in minutes. Always > 0: validated at creation.
    pub duration_min: i64,
    pub label: String,
}

impl ScheduleBreak {
    /// Create a pinned break. Rejects malformed times and non-positive
    /// durations here so the generator never has to.
    pub fn new(
        start_time: impl Into<String>,
        duration_min: i64,
        label: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let start_time = start_time.into();
        parse_time_of_day(&start_time)?;
        if duration_min <= 0 {
            return Err(ValidationError::NonPositiveDuration {
                field: "duration_min".into(),
            });
        }
        Ok(Self {
            id: format!("break-{}", uuid::Uuid::new_v4()),
            start_time,
            duration_min,
            label: label.into(),
        })
    }

    pub fn time_of_day(&self) -> Option<NaiveTime> {
        parse_time_of_day(&self.start_time).ok()
    }
}

/// The persisted schedule bucket: start time plus pinned breaks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulePlan {
    /// Hour of day the schedule origin sits at.
    pub start_hour: u32,
    pub start_minute: u32,
    #[serde(default)]
    pub breaks: Vec<ScheduleBreak>,
}

impl Default for SchedulePlan {
    fn default() -> Self {
        Self {
            start_hour: 8,
            start_minute: 0,
            breaks: Vec::new(),
        }
    }
}

impl SchedulePlan {
    pub fn set_start(&mut self, hour: u32, minute: u32) -> Result<(), ValidationError> {
        if hour > 23 || minute > 59 {
            return Err(ValidationError::InvalidValue {
                field: "start_time".into(),
                message: format!("{hour}:{minute:02} is not a time of day"),
            });
        }
        self.start_hour = hour;
        self.start_minute = minute;
        Ok(())
    }

    pub fn add_break(&mut self, b: ScheduleBreak) {
        self.breaks.push(b);
    }

    pub fn remove_break(&mut self, id: &str) -> bool {
        let before = self.breaks.len();
        self.breaks.retain(|b| b.id != id);
        self.breaks.len() < before
    }

    /// The schedule origin on the given day.
    pub fn origin_on(&self, date: NaiveDate) -> NaiveDateTime {
        let time = NaiveTime::from_hms_opt(self.start_hour, self.start_minute, 0)
            .unwrap_or(NaiveTime::MIN);
        date.and_time(time)
    }
}

/// Parse an "HH:MM" time-of-day string.
pub fn parse_time_of_day(value: &str) -> Result<NaiveTime, ValidationError> {
    let bad = || ValidationError::BadTimeOfDay {
        value: value.to_string(),
    };
    let (h, m) = value.split_once(':').ok_or_else(bad)?;
    let hour: u32 = h.parse().map_err(|_| bad())?;
    let minute: u32 = m.parse().map_err(|_| bad())?;
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(bad)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hh_mm() {
        assert_eq!(
            parse_time_of_day("09:30").unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap()
        );
    }

    #[test]
    fn rejects_malformed_times() {
        assert!(parse_time_of_day("9h30").is_err());
        assert!(parse_time_of_day("25:00").is_err());
        assert!(parse_time_of_day("12:60").is_err());
        assert!(parse_time_of_day("").is_err());
    }

    #[test]
    fn break_rejects_non_positive_duration() {
        assert!(ScheduleBreak::new("12:00", 0, "Lunch").is_err());
        assert!(ScheduleBreak::new("12:00", -15, "Lunch").is_err());
        assert!(ScheduleBreak::new("12:00", 30, "Lunch").is_ok());
    }

    #[test]
    fn plan_set_start_validates() {
        let mut plan = SchedulePlan::default();
        assert!(plan.set_start(24, 0).is_err());
        assert!(plan.set_start(7, 45).is_ok());
        assert_eq!(plan.start_hour, 7);
        assert_eq!(plan.start_minute, 45);
    }

    #[test]
    fn remove_break_by_id() {
        let mut plan = SchedulePlan::default();
        let b = ScheduleBreak::new("12:00", 30, "Lunch").unwrap();
        let id = b.id.clone();
        plan.add_break(b);
        assert!(plan.remove_break(&id));
        assert!(!plan.remove_break(&id));
    }
}
