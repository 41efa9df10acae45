//! Schedule timeline generator.
//!
//! A pure function from (work units, settings, day plan, origin date,
//! current pomodoro count) to an ordered list of positioned time blocks.
//! It reads a snapshot and mutates nothing; callers re-run it whenever any
//! input changes. Two invocations with identical inputs produce identical
//! output - the origin is supplied, never sampled from a clock.
//!
//! Blocks are pushed whole past pinned windows, never split.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{ScheduleBreak, SchedulePlan};
use crate::storage::Settings;
use crate::task::WorkUnit;

/// Fixed layout scale: rendering units per elapsed minute.
pub const PX_PER_MIN: i64 = 2;

/// Margin rendered past the last block, in minutes.
const EXTENT_MARGIN_MIN: i64 = 60;

/// Read-only snapshot the generator projects from.
#[derive(Debug, Clone, Copy)]
pub struct TimelineInput<'a> {
    pub units: &'a [WorkUnit],
    pub settings: &'a Settings,
    pub plan: &'a SchedulePlan,
    /// The day the schedule origin falls on.
    pub date: NaiveDate,
    /// Completed work units so far; seeds the long-break cadence.
    pub pomodoro_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockKind {
    Work,
    Break,
    ScheduledBreak,
}

/// One positioned block. A projection artifact: recomputed on every
/// invocation, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBlock {
    pub kind: BlockKind,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub duration_min: i64,
    pub label: String,
    pub color: Option<String>,
    /// Rendering offset from the origin, in layout units.
    pub offset: i64,
    /// Rendering length, in layout units.
    pub length: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    pub origin: NaiveDateTime,
    pub blocks: Vec<TimeBlock>,
    /// Total rendered extent in minutes: at least one full day, or the last
    /// block's end plus a margin, whichever is larger.
    pub extent_min: i64,
}

/// Generate the timeline.
///
/// Walks the work units from the origin, placing work/break pairs, pushing
/// any block that would overlap a pinned window to that window's end, and
/// inserting a long break after every `long_break_interval`-th completed
/// work unit (counting from the supplied pomodoro count).
pub fn generate(input: &TimelineInput) -> Timeline {
    let origin = input.plan.origin_on(input.date);
    let pinned = anchor_pinned(&input.plan.breaks, origin, input.date);

    // Interval constants are stored in seconds; everything past this point
    // is whole minutes.
    let work_min = input.settings.work_duration / 60;
    let short_min = input.settings.short_break_duration / 60;
    let long_min = input.settings.long_break_duration / 60;
    let interval = input.settings.long_break_interval.max(1);

    let mut blocks = Vec::new();
    let mut cursor = origin;
    let mut virtual_count = input.pomodoro_count;

    for unit in input.units {
        cursor = resolve_collision(cursor, work_min, &pinned);
        blocks.push(make_block(
            BlockKind::Work,
            cursor,
            work_min,
            unit.label.clone(),
            unit.color.clone(),
            origin,
        ));
        cursor += Duration::minutes(work_min);
        virtual_count += 1;

        let (break_min, label) = if virtual_count % interval == 0 {
            (long_min, "Long break")
        } else {
            (short_min, "Short break")
        };
        cursor = resolve_collision(cursor, break_min, &pinned);
        blocks.push(make_block(
            BlockKind::Break,
            cursor,
            break_min,
            label.to_string(),
            None,
            origin,
        ));
        cursor += Duration::minutes(break_min);
    }

    for (start, _end, b) in &pinned {
        if *start >= origin {
            blocks.push(make_block(
                BlockKind::ScheduledBreak,
                *start,
                b.duration_min,
                b.label.clone(),
                None,
                origin,
            ));
        }
    }

    blocks.sort_by(|a, b| a.start.cmp(&b.start).then(a.kind.cmp_order(&b.kind)));

    let last_end_min = blocks
        .iter()
        .map(|b| minutes_from(origin, b.end))
        .max()
        .unwrap_or(0);
    let extent_min = (24 * 60).max(last_end_min + EXTENT_MARGIN_MIN);

    Timeline {
        origin,
        blocks,
        extent_min,
    }
}

impl BlockKind {
    fn cmp_order(&self, other: &BlockKind) -> std::cmp::Ordering {
        fn rank(k: &BlockKind) -> u8 {
            match k {
                BlockKind::ScheduledBreak => 0,
                BlockKind::Work => 1,
                BlockKind::Break => 2,
            }
        }
        rank(self).cmp(&rank(other))
    }
}

/// Anchor each pinned break to the origin day, or the following day when
/// its time-of-day precedes the origin's (a "2:00 AM" break against an
/// "8:00 AM" start belongs to the coming night, not the past).
fn anchor_pinned<'a>(
    breaks: &'a [ScheduleBreak],
    origin: NaiveDateTime,
    date: NaiveDate,
) -> Vec<(NaiveDateTime, NaiveDateTime, &'a ScheduleBreak)> {
    let mut pinned: Vec<_> = breaks
        .iter()
        .filter_map(|b| {
            let tod = b.time_of_day()?;
            let day = if tod < origin.time() {
                date.succ_opt()?
            } else {
                date
            };
            let start = day.and_time(tod);
            Some((start, start + Duration::minutes(b.duration_min), b))
        })
        .collect();
    pinned.sort_by_key(|(start, _, _)| *start);
    pinned
}

/// Push the cursor past every pinned window the candidate block would
/// overlap. Re-checks after each push: clearing one window may land the
/// block inside another.
fn resolve_collision(
    mut cursor: NaiveDateTime,
    len_min: i64,
    pinned: &[(NaiveDateTime, NaiveDateTime, &ScheduleBreak)],
) -> NaiveDateTime {
    let mut moved = true;
    while moved {
        moved = false;
        let end = cursor + Duration::minutes(len_min);
        for (p_start, p_end, _) in pinned {
            if cursor < *p_end && end > *p_start {
                cursor = *p_end;
                moved = true;
                break;
            }
        }
    }
    cursor
}

fn minutes_from(origin: NaiveDateTime, t: NaiveDateTime) -> i64 {
    (t - origin).num_minutes()
}

fn make_block(
    kind: BlockKind,
    start: NaiveDateTime,
    duration_min: i64,
    label: String,
    color: Option<String>,
    origin: NaiveDateTime,
) -> TimeBlock {
    let end = start + Duration::minutes(duration_min);
    TimeBlock {
        kind,
        start,
        end,
        duration_min,
        label,
        color,
        offset: minutes_from(origin, start) * PX_PER_MIN,
        length: duration_min * PX_PER_MIN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskQueue;

    fn test_settings() -> Settings {
        Settings {
            work_duration: 1500,
            short_break_duration: 300,
            long_break_duration: 900,
            long_break_interval: 4,
            ..Settings::default()
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    fn units(n: u32) -> Vec<WorkUnit> {
        let mut queue = TaskQueue::new();
        let id = queue.add("deep work").id.clone();
        queue.set_estimate(&id, n as i64).unwrap();
        queue.work_units()
    }

    fn hm(h: u32, m: u32) -> NaiveDateTime {
        day().and_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn long_break_cadence_from_current_count() {
        // pomodoro_count = 3: the first generated work block is the 4th.
        let settings = test_settings();
        let plan = SchedulePlan::default();
        let units = units(2);
        let timeline = generate(&TimelineInput {
            units: &units,
            settings: &settings,
            plan: &plan,
            date: day(),
            pomodoro_count: 3,
        });

        let spans: Vec<_> = timeline
            .blocks
            .iter()
            .map(|b| (b.kind, b.start, b.end))
            .collect();
        assert_eq!(
            spans,
            vec![
                (BlockKind::Work, hm(8, 0), hm(8, 25)),
                (BlockKind::Break, hm(8, 25), hm(8, 40)), // long: count hit 4
                (BlockKind::Work, hm(8, 40), hm(9, 5)),
                (BlockKind::Break, hm(9, 5), hm(9, 10)), // short
            ]
        );
    }

    #[test]
    fn overlapping_block_is_pushed_whole() {
        let settings = test_settings();
        let mut plan = SchedulePlan::default();
        plan.set_start(11, 50).unwrap();
        plan.add_break(ScheduleBreak::new("12:00", 30, "Lunch").unwrap());
        let units = units(1);

        let timeline = generate(&TimelineInput {
            units: &units,
            settings: &settings,
            plan: &plan,
            date: day(),
            pomodoro_count: 0,
        });

        let work = timeline
            .blocks
            .iter()
            .find(|b| b.kind == BlockKind::Work)
            .unwrap();
        // 11:50 + 25 min would overlap 12:00-12:30: pushed to 12:30.
        assert_eq!(work.start, hm(12, 30));
        assert_eq!(work.end, hm(12, 55));
    }

    #[test]
    fn collision_resolution_is_transitive() {
        let settings = test_settings();
        let mut plan = SchedulePlan::default();
        plan.set_start(9, 0).unwrap();
        // Clearing the first window lands the block inside the second.
        plan.add_break(ScheduleBreak::new("09:10", 20, "Standup").unwrap());
        plan.add_break(ScheduleBreak::new("09:30", 45, "Review").unwrap());
        let units = units(1);

        let timeline = generate(&TimelineInput {
            units: &units,
            settings: &settings,
            plan: &plan,
            date: day(),
            pomodoro_count: 0,
        });

        let work = timeline
            .blocks
            .iter()
            .find(|b| b.kind == BlockKind::Work)
            .unwrap();
        assert_eq!(work.start, hm(10, 15));
    }

    #[test]
    fn early_pinned_break_anchors_to_next_day() {
        let settings = test_settings();
        let mut plan = SchedulePlan::default();
        plan.add_break(ScheduleBreak::new("02:00", 60, "Night shift").unwrap());
        let timeline = generate(&TimelineInput {
            units: &[],
            settings: &settings,
            plan: &plan,
            date: day(),
            pomodoro_count: 0,
        });

        assert_eq!(timeline.blocks.len(), 1);
        let block = &timeline.blocks[0];
        assert_eq!(block.kind, BlockKind::ScheduledBreak);
        assert_eq!(
            block.start,
            day().succ_opt().unwrap().and_hms_opt(2, 0, 0).unwrap()
        );
    }

    #[test]
    fn empty_queue_renders_only_pinned_breaks() {
        let settings = test_settings();
        let mut plan = SchedulePlan::default();
        plan.add_break(ScheduleBreak::new("12:00", 30, "Lunch").unwrap());
        let timeline = generate(&TimelineInput {
            units: &[],
            settings: &settings,
            plan: &plan,
            date: day(),
            pomodoro_count: 0,
        });

        assert_eq!(timeline.blocks.len(), 1);
        assert_eq!(timeline.blocks[0].label, "Lunch");
    }

    #[test]
    fn pinned_window_covering_origin_still_produces_blocks() {
        let settings = test_settings();
        let mut plan = SchedulePlan::default();
        plan.set_start(8, 0).unwrap();
        plan.add_break(ScheduleBreak::new("08:00", 120, "Offsite").unwrap());
        let units = units(1);

        let timeline = generate(&TimelineInput {
            units: &units,
            settings: &settings,
            plan: &plan,
            date: day(),
            pomodoro_count: 0,
        });

        let work = timeline
            .blocks
            .iter()
            .find(|b| b.kind == BlockKind::Work)
            .unwrap();
        assert_eq!(work.start, hm(10, 0));
    }

    #[test]
    fn generator_is_idempotent() {
        let settings = test_settings();
        let mut plan = SchedulePlan::default();
        plan.add_break(ScheduleBreak::new("12:00", 30, "Lunch").unwrap());
        let units = units(3);
        let input = TimelineInput {
            units: &units,
            settings: &settings,
            plan: &plan,
            date: day(),
            pomodoro_count: 1,
        };

        assert_eq!(generate(&input), generate(&input));
    }

    #[test]
    fn layout_is_proportional_to_minutes() {
        let settings = test_settings();
        let plan = SchedulePlan::default();
        let units = units(1);
        let timeline = generate(&TimelineInput {
            units: &units,
            settings: &settings,
            plan: &plan,
            date: day(),
            pomodoro_count: 0,
        });

        let work = &timeline.blocks[0];
        assert_eq!(work.offset, 0);
        assert_eq!(work.length, 25 * PX_PER_MIN);
        let brk = &timeline.blocks[1];
        assert_eq!(brk.offset, 25 * PX_PER_MIN);
    }

    #[test]
    fn extent_covers_at_least_a_day() {
        let settings = test_settings();
        let plan = SchedulePlan::default();
        let timeline = generate(&TimelineInput {
            units: &[],
            settings: &settings,
            plan: &plan,
            date: day(),
            pomodoro_count: 0,
        });
        assert_eq!(timeline.extent_min, 24 * 60);
    }
}
