// tests/planning_flow.rs

mod common;

use chrono::{Duration as ChronoDuration, Utc};
use tonight::errors::TonightError;
use tonight::parse_planning;
use tonight::{do_later, plan};
use tonight_test_utils::builders::{LogBuilder, TaskBuilder};

use common::{MINUTE, ids, init_tracing, memory_services};

#[test]
fn planning_grammar() {
    let req = parse_planning("#work release for !2h30m").unwrap();
    assert_eq!(req.q, "#work release");
    assert_eq!(req.duration, 150 * MINUTE);
    assert!(req.strict);
    assert_eq!(req.to_string(), "#work release for !2h30m");

    assert_eq!(parse_planning("45m").unwrap().to_string(), "45m");
    assert!(matches!(
        parse_planning("tonight please"),
        Err(TonightError::InvalidPlanning(_))
    ));
    assert!(matches!(
        parse_planning("emails for 3x"),
        Err(TonightError::InvalidDuration(_))
    ));
}

#[test]
fn partially_done_tasks_count_what_is_left() {
    let tasks = vec![
        TaskBuilder::new(1)
            .score(3.0)
            .duration("1h")
            .log(LogBuilder::progress(75).build())
            .build(),
        TaskBuilder::new(2).score(2.0).duration("45m").build(),
        TaskBuilder::new(3).score(1.0).duration("30m").build(),
    ];

    let planned = plan(tasks, 60 * MINUTE, true);
    assert_eq!(ids(&planned), vec![1, 2]);
}

#[test]
fn deadlines_pull_tasks_forward() {
    let soon = Utc::now() + ChronoDuration::days(2);
    let tax = format!("tax return ~30m >{}", soon.format("%Y-%m-%d"));
    let (tasks, mut plannings) = memory_services(&["!!!!! someday ~30m", tax.as_str()]).unwrap();

    let planning = plannings.plan(&tasks, "!30m").unwrap();
    assert_eq!(ids(&planning.tasks), vec![2]);
}

#[test]
fn postponed_tasks_sink_to_the_bottom() {
    let (mut tasks, mut plannings) =
        memory_services(&["!!! dentist ~30m", "laundry ~30m"]).unwrap();
    tasks.postpone(1, "2999-12-31").unwrap();

    let planning = plannings.plan(&tasks, "!30m").unwrap();
    assert_eq!(ids(&planning.tasks), vec![2]);
}

#[test]
fn defer_keeps_the_planned_prefix() {
    init_tracing();
    let tasks = (1..=5)
        .map(|id| {
            TaskBuilder::new(id)
                .score(10.0 - id as f64)
                .duration("20m")
                .build()
        })
        .collect::<Vec<_>>();

    let planning = tonight::Planning {
        duration: 60 * MINUTE,
        strict: true,
        tasks: plan(tasks.clone(), 60 * MINUTE, true),
        ..Default::default()
    };
    assert_eq!(ids(&planning.tasks), vec![1, 2, 3]);

    let once = do_later(&planning, tasks.clone(), 2);
    assert_eq!(ids(&once.tasks), vec![1, 3, 4]);

    // Deferring only remembers the current planning, so 2 is eligible again.
    let twice = do_later(&once, tasks, 1);
    assert_eq!(ids(&twice.tasks), vec![3, 4, 2]);
}

#[test]
fn service_round_trip() {
    init_tracing();
    let (mut tasks, mut plannings) = memory_services(&[
        "!!!! report #work ~30m",
        "!!! slides #work ~30m",
        "!! emails #work ~30m",
        "!!!!! groceries ~30m",
    ])
    .unwrap();

    let planning = plannings.plan(&tasks, "#work for !1h").unwrap();
    assert_eq!(ids(&planning.tasks), vec![1, 2]);

    let deferred = plannings.do_later(&tasks, 1).unwrap();
    assert_eq!(ids(&deferred.tasks), vec![2, 3]);

    tasks.log(2, "done").unwrap();
    tasks.log(3, "won't do").unwrap();
    let replanned = plannings.current(&tasks).unwrap().unwrap();
    assert_ne!(replanned.id, deferred.id);
    assert_eq!(replanned.q, "#work");
    assert_eq!(ids(&replanned.tasks), vec![1]);

    plannings.dismiss().unwrap();
    assert_eq!(plannings.current(&tasks).unwrap(), None);
}
