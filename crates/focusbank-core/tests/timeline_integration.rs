//! Integration tests for the schedule timeline generator.
//!
//! Property coverage: collision avoidance against arbitrary pinned windows,
//! long-break cadence, and purity of the generator.

use chrono::NaiveDate;
use focusbank_core::schedule::{generate, BlockKind, ScheduleBreak, SchedulePlan, TimelineInput};
use focusbank_core::{Settings, TaskQueue};
use proptest::prelude::*;

fn settings(work: i64, short: i64, long: i64, interval: u32) -> Settings {
    Settings {
        work_duration: work,
        short_break_duration: short,
        long_break_duration: long,
        long_break_interval: interval,
        ..Settings::default()
    }
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

fn queue_of(estimates: &[u32]) -> TaskQueue {
    let mut queue = TaskQueue::new();
    for (i, est) in estimates.iter().enumerate() {
        let id = queue.add(format!("task {i}")).id.clone();
        queue.set_estimate(&id, *est as i64).unwrap();
    }
    queue
}

#[test]
fn documented_cadence_scenario() {
    // workDuration=1500s, shortBreak=300s, longBreak=900s, interval=4,
    // pomodoroCount=3, one task estimated=2, origin 08:00.
    let settings = settings(1500, 300, 900, 4);
    let plan = SchedulePlan::default();
    let queue = queue_of(&[2]);
    let units = queue.work_units();

    let timeline = generate(&TimelineInput {
        units: &units,
        settings: &settings,
        plan: &plan,
        date: day(),
        pomodoro_count: 3,
    });

    let fmt: Vec<String> = timeline
        .blocks
        .iter()
        .map(|b| {
            format!(
                "{:?} {}-{}",
                b.kind,
                b.start.format("%H:%M"),
                b.end.format("%H:%M")
            )
        })
        .collect();
    assert_eq!(
        fmt,
        vec![
            "Work 08:00-08:25",
            "Break 08:25-08:40",
            "Work 08:40-09:05",
            "Break 09:05-09:10",
        ]
    );
    assert_eq!(timeline.blocks[1].duration_min, 15);
    assert_eq!(timeline.blocks[3].duration_min, 5);
}

#[test]
fn every_nth_break_is_long() {
    let settings = settings(1500, 300, 900, 3);
    let plan = SchedulePlan::default();
    let queue = queue_of(&[9]);
    let units = queue.work_units();

    let timeline = generate(&TimelineInput {
        units: &units,
        settings: &settings,
        plan: &plan,
        date: day(),
        pomodoro_count: 0,
    });

    let breaks: Vec<i64> = timeline
        .blocks
        .iter()
        .filter(|b| b.kind == BlockKind::Break)
        .map(|b| b.duration_min)
        .collect();
    assert_eq!(breaks, vec![5, 5, 15, 5, 5, 15, 5, 5, 15]);
}

#[test]
fn subtasks_drive_the_projection() {
    let settings = settings(1500, 300, 900, 4);
    let plan = SchedulePlan::default();
    let mut queue = TaskQueue::new();
    let id = queue.add("parent").id.clone();
    queue.set_estimate(&id, 100).unwrap();
    queue.add_subtask(&id, "only child").unwrap();
    let units = queue.work_units();

    let timeline = generate(&TimelineInput {
        units: &units,
        settings: &settings,
        plan: &plan,
        date: day(),
        pomodoro_count: 0,
    });

    let work: Vec<_> = timeline
        .blocks
        .iter()
        .filter(|b| b.kind == BlockKind::Work)
        .collect();
    assert_eq!(work.len(), 1);
    assert_eq!(work[0].label, "only child");
}

proptest! {
    /// No generated work/break block may overlap any pinned window.
    #[test]
    fn no_block_overlaps_pinned_windows(
        estimates in prop::collection::vec(1u32..4, 1..4),
        pins in prop::collection::vec((8u32..18, 0u32..60, 5i64..90), 0..4),
        pomodoro_count in 0u32..8,
    ) {
        let settings = settings(1500, 300, 900, 4);
        let mut plan = SchedulePlan::default();
        for (h, m, dur) in &pins {
            plan.add_break(
                ScheduleBreak::new(format!("{h:02}:{m:02}"), *dur, "pinned").unwrap(),
            );
        }
        let queue = queue_of(&estimates);
        let units = queue.work_units();

        let timeline = generate(&TimelineInput {
            units: &units,
            settings: &settings,
            plan: &plan,
            date: day(),
            pomodoro_count,
        });

        let pinned: Vec<_> = timeline
            .blocks
            .iter()
            .filter(|b| b.kind == BlockKind::ScheduledBreak)
            .cloned()
            .collect();
        for block in timeline
            .blocks
            .iter()
            .filter(|b| b.kind != BlockKind::ScheduledBreak)
        {
            for pin in &pinned {
                prop_assert!(
                    block.end <= pin.start || block.start >= pin.end,
                    "block {:?}..{:?} overlaps pinned {:?}..{:?}",
                    block.start, block.end, pin.start, pin.end,
                );
            }
        }
    }

    /// Identical inputs always produce identical output.
    #[test]
    fn generator_has_no_hidden_clock(
        estimates in prop::collection::vec(1u32..4, 0..4),
        pomodoro_count in 0u32..8,
    ) {
        let settings = settings(1500, 300, 900, 4);
        let plan = SchedulePlan::default();
        let queue = queue_of(&estimates);
        let units = queue.work_units();
        let input = TimelineInput {
            units: &units,
            settings: &settings,
            plan: &plan,
            date: day(),
            pomodoro_count,
        };
        prop_assert_eq!(generate(&input), generate(&input));
    }
}
