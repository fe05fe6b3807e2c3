//! End-to-end scenarios for whole command trees

use std::time::Duration;

use cadence_compose::{Concurrent, Deadline, EventMarker, EventPath, Sequential};
use cadence_core::{BoxedCommand, Command, LoopTime, RunOnce, StateHandle, Wait};
use cadence_runtime::{Scheduler, SchedulerConfig, SchedulerStatus};
use proptest::collection::vec;
use proptest::prelude::*;

use crate::{CallLog, LifecycleCall, ProbeCommand, TickHarness};

const STEP: Duration = Duration::from_millis(20);

fn log() -> StateHandle<CallLog> {
    StateHandle::new(CallLog::default())
}

#[test]
fn test_sequential_two_then_three_tick_walkthrough() {
    let log = log();
    let mut group = Sequential::new(vec![
        Box::new(ProbeCommand::after_runs("a", 2, &log)),
        Box::new(ProbeCommand::after_runs("b", 3, &log)),
    ]);

    let mut now = LoopTime::ZERO;
    group.init(now);

    // Ticks 1-2: a runs; tick 2 finalizes a
    for _ in 0..2 {
        now = now + STEP;
        group.run(now);
    }
    {
        let snapshot = log.get();
        assert_eq!(snapshot.runs("a"), 2);
        assert_eq!(snapshot.finalizes("a"), vec![false]);
        assert_eq!(snapshot.inits("b"), 0);
    }
    assert!(!group.is_completed(now));

    // Ticks 3-5: b initializes, runs, and finalizes on tick 5
    for _ in 0..3 {
        now = now + STEP;
        group.run(now);
    }
    let snapshot = log.get();
    assert_eq!(snapshot.inits("b"), 1);
    assert_eq!(snapshot.runs("b"), 3);
    assert_eq!(snapshot.finalizes("b"), vec![false]);
    assert_eq!(snapshot.finalize_order(), vec!["a", "b"]);

    // Completion is idempotent and polling past it has no side effects
    assert!(group.is_completed(now));
    assert!(group.is_completed(now));
    let before = log.get().entries.len();
    group.run(now + STEP);
    assert_eq!(log.get().entries.len(), before);
}

#[test]
fn test_concurrent_group_timeout_walkthrough() {
    let log = log();
    let mut group = Concurrent::with_timeout(
        vec![
            Box::new(ProbeCommand::never("a", &log)),
            Box::new(ProbeCommand::after_elapsed("b", Duration::from_millis(100), &log)),
        ],
        Duration::from_millis(500),
    );

    let mut harness = TickHarness::new(STEP);
    // b's 100ms window is armed on the first pass (tick 1, t=20ms), so b
    // finalizes at t=120ms (tick 6); the group keeps polling a until the
    // 500ms group timeout at tick 25. On the timeout tick itself the group
    // is already completed and no child is polled, so a sees ticks 1-24.
    assert_eq!(harness.run(&mut group, 100), Some(25));

    let snapshot = log.get();
    assert_eq!(snapshot.finalizes("b"), vec![false]);
    assert_eq!(snapshot.runs("b"), 6);
    assert_eq!(snapshot.runs("a"), 24);
    // a never completed and is never finalized
    assert_eq!(snapshot.finalizes("a"), Vec::<bool>::new());
}

#[test]
fn test_deadline_child_on_first_tick_ends_group() {
    let log = log();
    let mut group = Deadline::new(
        Box::new(ProbeCommand::after_runs("deadline", 1, &log)),
        vec![
            Box::new(ProbeCommand::never("x", &log)),
            Box::new(ProbeCommand::never("y", &log)),
        ],
    );

    let mut harness = TickHarness::new(STEP);
    assert_eq!(harness.run(&mut group, 10), Some(1));

    let snapshot = log.get();
    assert_eq!(snapshot.finalizes("deadline"), vec![false]);
    assert_eq!(snapshot.runs("x"), 1);
    assert_eq!(snapshot.finalizes("x"), Vec::<bool>::new());
    assert_eq!(snapshot.finalizes("y"), Vec::<bool>::new());
}

#[test]
fn test_event_marker_preempts_running_primary() {
    let log = log();
    let mut group = EventPath::new(
        Box::new(ProbeCommand::never("path", &log)),
        vec![EventMarker::at_secs(1.0, ["x"])],
        vec![(
            "x".to_string(),
            Box::new(ProbeCommand::after_runs("x", 3, &log)) as BoxedCommand,
        )],
    )
    .unwrap();

    let mut now = LoopTime::ZERO;
    group.init(now);
    for _ in 0..50 {
        now = now + STEP;
        group.run(now);
    }

    // The 1.0s marker (tick 50) stops the path follower and starts x
    let snapshot = log.get();
    assert_eq!(snapshot.finalizes("path"), vec![true]);
    assert_eq!(snapshot.inits("x"), 1);
    // The primary was deactivated, not completed, so the group is still open
    assert!(!group.is_completed(now));

    for _ in 0..3 {
        now = now + STEP;
        group.run(now);
    }
    assert_eq!(log.get().finalizes("x"), vec![false]);
}

#[test]
fn test_nested_tree_runs_stage_by_stage() {
    let log = log();
    let stage_one = Concurrent::new(vec![
        Box::new(Wait::new(Duration::from_millis(40))) as BoxedCommand,
        Box::new(ProbeCommand::after_runs("score", 3, &log)),
    ]);
    let stage_two = Deadline::new(
        Box::new(Wait::new(Duration::from_millis(60))),
        vec![Box::new(ProbeCommand::never("spin", &log)) as BoxedCommand],
    );
    let mut routine = Sequential::new(vec![
        Box::new(stage_one) as BoxedCommand,
        Box::new(stage_two),
    ]);

    let mut harness = TickHarness::new(STEP);
    // Stage one drains at tick 3 (slowest member), stage two's 60ms
    // deadline then runs ticks 4-7
    assert_eq!(harness.run(&mut routine, 50), Some(7));

    let snapshot = log.get();
    assert_eq!(snapshot.finalizes("score"), vec![false]);
    assert_eq!(snapshot.runs("spin"), 4);
    assert_eq!(snapshot.finalizes("spin"), Vec::<bool>::new());
}

#[test]
fn test_scheduler_drives_event_path_with_shared_state() {
    let intake_dropped = StateHandle::new(false);
    let handle = intake_dropped.clone();

    let routine = EventPath::new(
        Box::new(Wait::new(Duration::from_millis(30))),
        vec![EventMarker::new(Duration::from_millis(10), ["drop_intake"])],
        vec![(
            "drop_intake".to_string(),
            Box::new(RunOnce::new(move || handle.set(true))) as BoxedCommand,
        )],
    )
    .unwrap()
    .exempt_primary();

    let mut scheduler = Scheduler::with_config(
        Box::new(routine),
        SchedulerConfig {
            tick_interval: Duration::from_millis(2),
            budget: Some(Duration::from_secs(2)),
        },
    )
    .unwrap();

    assert_eq!(scheduler.run_to_completion(), SchedulerStatus::Finished);
    assert!(intake_dropped.get());
}

proptest! {
    #[test]
    fn prop_sequential_completes_at_sum_in_order(
        ticks in vec(1u32..5, 1..6),
    ) {
        let log = log();
        let children = ticks
            .iter()
            .enumerate()
            .map(|(i, &n)| {
                Box::new(ProbeCommand::after_runs(&format!("c{i}"), n, &log)) as BoxedCommand
            })
            .collect();
        let mut group = Sequential::new(children);

        let sum: u32 = ticks.iter().sum();
        let mut harness = TickHarness::new(STEP);
        prop_assert_eq!(harness.run(&mut group, sum + 5), Some(sum));

        let snapshot = log.get();
        for i in 0..ticks.len() {
            let name = format!("c{i}");
            prop_assert_eq!(snapshot.inits(&name), 1);
            prop_assert_eq!(snapshot.finalizes(&name), vec![false]);
        }
        let expected: Vec<String> = (0..ticks.len()).map(|i| format!("c{i}")).collect();
        prop_assert_eq!(snapshot.finalize_order(), expected);
    }

    #[test]
    fn prop_concurrent_completes_at_max(
        ticks in vec(1u32..6, 1..6),
    ) {
        let log = log();
        let children = ticks
            .iter()
            .enumerate()
            .map(|(i, &n)| {
                Box::new(ProbeCommand::after_runs(&format!("c{i}"), n, &log)) as BoxedCommand
            })
            .collect();
        let mut group = Concurrent::new(children);

        let max = *ticks.iter().max().unwrap();
        let mut harness = TickHarness::new(STEP);
        prop_assert_eq!(harness.run(&mut group, max + 5), Some(max));

        let snapshot = log.get();
        for (i, &n) in ticks.iter().enumerate() {
            let name = format!("c{i}");
            // Each child stops being polled the moment it finishes
            prop_assert_eq!(snapshot.runs(&name), n as usize);
            prop_assert_eq!(snapshot.finalizes(&name), vec![false]);
        }
    }
}

#[test]
fn test_call_log_sequence_shape() {
    let log = log();
    let mut probe = ProbeCommand::after_runs("p", 1, &log);
    let mut harness = TickHarness::new(STEP);
    harness.run(&mut probe, 5);

    assert_eq!(
        log.get().entries,
        vec![
            ("p".to_string(), LifecycleCall::Init),
            ("p".to_string(), LifecycleCall::Run),
            ("p".to_string(), LifecycleCall::Finalize { interrupted: false }),
        ]
    );
}
