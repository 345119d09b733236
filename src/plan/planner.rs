// src/plan/planner.rs

use std::collections::HashMap;
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::PlannerConfig;
use crate::plan::planning::Planning;
use crate::task::{Task, TaskId};

/// Keep only tasks whose dependencies are all flagged done.
pub fn filter_undone_dependencies(tasks: Vec<Task>) -> Vec<Task> {
    tasks
        .into_iter()
        .filter(|task| {
            let ready = task.dependencies.iter().all(|d| d.done);
            if !ready {
                debug!(task = task.id, "skipping task with undone dependencies");
            }
            ready
        })
        .collect()
}

/// Stable sort by descending score: equal scores keep their input order,
/// which callers use to carry manual rank or search relevance.
pub fn sort_by_score(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| b.score.total_cmp(&a.score));
}

/// Select and order tasks to fit `budget`, with default settings.
pub fn plan(tasks: Vec<Task>, budget: Duration, strict: bool) -> Vec<Task> {
    plan_with(tasks, budget, strict, &PlannerConfig::default())
}

/// Select and order tasks to fit `budget`.
///
/// Tasks with undone dependencies are dropped, the rest are taken by
/// descending score while accumulating what is left to do on each:
/// - `strict`: a task that would push the total over `budget` is skipped and
///   the walk goes on; the plan never exceeds the budget.
/// - otherwise tasks are taken unconditionally until the budget is reached,
///   so the last one may overshoot it.
pub fn plan_with(
    tasks: Vec<Task>,
    budget: Duration,
    strict: bool,
    cfg: &PlannerConfig,
) -> Vec<Task> {
    let mut eligible = filter_undone_dependencies(tasks);
    sort_by_score(&mut eligible);

    let planned = select(eligible, budget, strict, Duration::ZERO, cfg);
    debug!(
        planned = planned.len(),
        budget_secs = budget.as_secs(),
        strict,
        "planned tasks"
    );
    planned
}

/// Tasks to append to `planning` once `task_id` is pushed to later.
///
/// Candidates are the eligible tasks (as in [`plan`]) that come after
/// `task_id` in score order and are not already planned; if `task_id` is not
/// eligible any more, every unplanned eligible task is a candidate. The budget
/// is first charged with what is left on the tasks that stay planned.
pub fn plan_next(
    tasks: Vec<Task>,
    planning: &Planning,
    task_id: TaskId,
    cfg: &PlannerConfig,
) -> Vec<Task> {
    let default = cfg.default_task_duration;

    // Fresh copies know about progress logged since the planning was made.
    let fresh: HashMap<TaskId, Duration> = tasks
        .iter()
        .map(|t| (t.id, t.left_duration(default)))
        .collect();
    let spent: Duration = planning
        .tasks
        .iter()
        .filter(|t| t.id != task_id)
        .map(|t| {
            fresh
                .get(&t.id)
                .copied()
                .unwrap_or_else(|| t.left_duration(default))
        })
        .sum();

    let mut eligible = filter_undone_dependencies(tasks);
    sort_by_score(&mut eligible);

    let start = match eligible.iter().position(|t| t.id == task_id) {
        Some(index) => index + 1,
        None => {
            debug!(task = task_id, "deferred task not eligible; backfilling from the top");
            0
        }
    };

    let candidates = eligible
        .into_iter()
        .skip(start)
        .filter(|t| t.id != task_id && !planning.contains(t.id));

    select(candidates, planning.duration, planning.strict, spent, cfg)
}

/// Push `task_id` to later with default settings.
pub fn do_later(planning: &Planning, tasks: Vec<Task>, task_id: TaskId) -> Planning {
    do_later_with(planning, tasks, task_id, &PlannerConfig::default())
}

/// Remove `task_id` from `planning` and backfill the freed time.
///
/// The remaining planned tasks keep their order; newly chosen ones are
/// appended after them.
pub fn do_later_with(
    planning: &Planning,
    tasks: Vec<Task>,
    task_id: TaskId,
    cfg: &PlannerConfig,
) -> Planning {
    if !planning.contains(task_id) {
        warn!(task = task_id, "task to do later is not part of the planning");
    }

    let next = plan_next(tasks, planning, task_id, cfg);
    debug!(task = task_id, backfilled = next.len(), "deferred task");

    let mut updated = planning.clone();
    updated.tasks.retain(|t| t.id != task_id);
    updated.tasks.extend(next);
    updated
}

/// Greedy walk shared by [`plan_with`] and [`plan_next`].
fn select<I>(
    candidates: I,
    budget: Duration,
    strict: bool,
    mut spent: Duration,
    cfg: &PlannerConfig,
) -> Vec<Task>
where
    I: IntoIterator<Item = Task>,
{
    let mut planned = Vec::new();

    for task in candidates {
        if spent >= budget {
            break;
        }

        let left = task.left_duration(cfg.default_task_duration);
        if strict && spent + left > budget {
            debug!(task = task.id, left_secs = left.as_secs(), "does not fit; skipping");
            continue;
        }

        spent += left;
        planned.push(task);
    }

    planned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Dependency, Log};
    use crate::types::LogType;

    const MINUTE: Duration = Duration::from_secs(60);

    fn task(id: TaskId, score: f64, duration: &str) -> Task {
        Task {
            id,
            score,
            duration: Some(duration.to_string()),
            ..Task::default()
        }
    }

    fn ids(tasks: &[Task]) -> Vec<TaskId> {
        tasks.iter().map(|t| t.id).collect()
    }

    #[test]
    fn drops_tasks_with_undone_dependencies() {
        let mut blocked = task(1, 9.0, "10m");
        blocked.dependencies = vec![Dependency {
            id: 5,
            done: false,
            title: "prereq".to_string(),
        }];
        let mut unblocked = task(2, 1.0, "10m");
        unblocked.dependencies = vec![Dependency {
            id: 6,
            done: true,
            title: "done prereq".to_string(),
        }];

        let kept = filter_undone_dependencies(vec![blocked, unblocked, task(3, 0.0, "1m")]);
        assert_eq!(ids(&kept), vec![2, 3]);
    }

    #[test]
    fn orders_by_score_keeping_ties_stable() {
        let tasks = vec![
            task(1, 1.0, "1m"),
            task(2, 3.0, "1m"),
            task(3, 1.0, "1m"),
            task(4, 3.0, "1m"),
        ];
        let planned = plan(tasks, 60 * MINUTE, false);
        assert_eq!(ids(&planned), vec![2, 4, 1, 3]);
    }

    #[test]
    fn strict_skips_what_does_not_fit() {
        let tasks = vec![
            task(1, 5.0, "40m"),
            task(2, 4.0, "30m"),
            task(3, 3.0, "20m"),
            task(4, 2.0, "5m"),
        ];
        let planned = plan(tasks, 60 * MINUTE, true);
        assert_eq!(ids(&planned), vec![1, 3]);
    }

    #[test]
    fn non_strict_lets_the_last_task_overshoot() {
        let tasks = vec![
            task(1, 5.0, "40m"),
            task(2, 4.0, "30m"),
            task(3, 3.0, "20m"),
        ];
        let planned = plan(tasks, 60 * MINUTE, false);
        assert_eq!(ids(&planned), vec![1, 2]);
    }

    #[test]
    fn uses_remaining_time_and_default_duration() {
        let mut half_done = task(1, 5.0, "1h");
        half_done.log = vec![Log::new(LogType::Progress, 50, "")];
        let unknown = Task {
            id: 2,
            score: 4.0,
            ..Task::default()
        };
        let cfg = PlannerConfig {
            default_task_duration: 30 * MINUTE,
        };

        let planned = plan_with(
            vec![half_done, unknown, task(3, 1.0, "1m")],
            60 * MINUTE,
            true,
            &cfg,
        );
        assert_eq!(ids(&planned), vec![1, 2]);
    }

    #[test]
    fn empty_input_plans_nothing() {
        assert!(plan(Vec::new(), 60 * MINUTE, true).is_empty());
        assert!(plan(vec![task(1, 1.0, "1m")], Duration::ZERO, false).is_empty());
    }

    #[test]
    fn do_later_backfills_after_the_deferred_task() {
        let tasks = vec![
            task(1, 9.0, "20m"),
            task(2, 8.0, "20m"),
            task(3, 7.0, "20m"),
            task(4, 6.0, "20m"),
            task(5, 5.0, "20m"),
        ];
        let planning = Planning {
            duration: 60 * MINUTE,
            strict: true,
            tasks: plan(tasks.clone(), 60 * MINUTE, true),
            ..Planning::default()
        };
        assert_eq!(ids(&planning.tasks), vec![1, 2, 3]);

        let updated = do_later(&planning, tasks, 2);
        assert_eq!(ids(&updated.tasks), vec![1, 3, 4]);
        assert_eq!(updated.duration, planning.duration);
    }

    #[test]
    fn do_later_never_readds_the_deferred_task() {
        let tasks = vec![task(1, 9.0, "20m"), task(2, 8.0, "20m")];
        let planning = Planning {
            duration: 60 * MINUTE,
            tasks: plan(tasks.clone(), 60 * MINUTE, false),
            ..Planning::default()
        };

        let updated = do_later(&planning, tasks, 1);
        assert_eq!(ids(&updated.tasks), vec![2]);
    }

    #[test]
    fn do_later_skips_candidates_ranked_before_the_deferred_task() {
        // Task 2 was skipped by the strict plan; it ranks before 3 and stays out.
        let tasks = vec![
            task(1, 9.0, "30m"),
            task(2, 8.0, "45m"),
            task(3, 7.0, "20m"),
            task(4, 6.0, "10m"),
        ];
        let planning = Planning {
            duration: 60 * MINUTE,
            strict: true,
            tasks: plan(tasks.clone(), 60 * MINUTE, true),
            ..Planning::default()
        };
        assert_eq!(ids(&planning.tasks), vec![1, 3, 4]);

        let updated = do_later(&planning, tasks, 3);
        assert_eq!(ids(&updated.tasks), vec![1, 4]);
    }
}
