// src/dag/score.rs

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::ScoreConfig;
use crate::dag::graph::DependencyGraph;
use crate::errors::Result;
use crate::task::{Task, TaskId};

/// Score every task and propagate urgency from dependents to prerequisites.
///
/// Each task first gets `unary(task)`. Then, prerequisites first in reverse
/// topological order, every task adds the final score of each task that
/// directly needs it:
///
/// ```text
/// final[x] = unary[x] + sum(final[d] for d needing x)
/// ```
///
/// A task blocking something urgent therefore becomes at least as urgent as
/// what it blocks. Diamonds contribute once per path. Cyclic input is
/// rejected with `TonightError::DependencyCycle`.
pub fn score_many<F>(tasks: &[Task], unary: F) -> Result<HashMap<TaskId, f64>>
where
    F: Fn(&Task) -> f64,
{
    let mut scores: HashMap<TaskId, f64> = tasks.iter().map(|t| (t.id, unary(t))).collect();

    let graph = DependencyGraph::from_tasks(tasks);
    let order = graph.topological_order()?;

    for &id in order.iter().rev() {
        let propagated: f64 = graph
            .dependents_of(id)
            .iter()
            .filter_map(|dependent| scores.get(dependent))
            .sum();

        if let Some(score) = scores.get_mut(&id) {
            *score += propagated;
        }
    }

    debug!(tasks = scores.len(), "scored tasks");
    Ok(scores)
}

/// Unary urgency of a task, now, with default weights.
pub fn score(task: &Task) -> f64 {
    score_at(task, Utc::now(), &ScoreConfig::default())
}

/// Unary urgency of a task at instant `now`.
///
/// - priority (0 to 5);
/// - plus `min(ln(1 + hours), duration_cap)` for a positive duration;
/// - plus `deadline_weight * (1 - 1 / (1 + exp(3 - seconds_past_deadline)))`
///   when a deadline is set.
///
/// A task postponed past `now` scores 0; [`score_many`] still adds what
/// depends on it.
pub fn score_at(task: &Task, now: DateTime<Utc>, cfg: &ScoreConfig) -> f64 {
    if task.is_postponed_at(now) {
        return 0.0;
    }

    let mut s = f64::from(task.priority);

    if let Some(duration) = task.parsed_duration().filter(|d| !d.is_zero()) {
        let hours = duration.as_secs_f64() / 3600.0;
        s += (1.0 + hours).ln().min(cfg.duration_cap);
    }

    if let Some(deadline) = task.deadline {
        let seconds_past = (now - deadline).num_milliseconds() as f64 / 1000.0;
        s += cfg.deadline_weight * (1.0 - 1.0 / (1.0 + (3.0 - seconds_past).exp()));
    }

    s
}

/// A unary scoring closure pinned to one instant, for [`score_many`].
pub fn unary_scorer(now: DateTime<Utc>, cfg: ScoreConfig) -> impl Fn(&Task) -> f64 {
    move |task| score_at(task, now, &cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Dependency;
    use chrono::{Duration as ChronoDuration, TimeZone};

    fn task(id: TaskId, needs: &[TaskId]) -> Task {
        Task {
            id,
            dependencies: needs.iter().copied().map(Dependency::new).collect(),
            ..Task::default()
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap()
    }

    #[test]
    fn propagates_through_a_chain() {
        let tasks = vec![
            task(1, &[]),
            task(11, &[1]),
            task(12, &[1]),
            task(121, &[12]),
            task(122, &[12]),
        ];
        let scores = score_many(&tasks, |_| 1.0).unwrap();

        let expected = HashMap::from([(1, 5.0), (11, 1.0), (12, 3.0), (121, 1.0), (122, 1.0)]);
        assert_eq!(scores, expected);
    }

    #[test]
    fn independent_tasks_keep_their_unary_score() {
        let tasks = vec![task(1, &[]), task(2, &[])];
        let scores = score_many(&tasks, |t| t.id as f64).unwrap();
        assert_eq!(scores[&1], 1.0);
        assert_eq!(scores[&2], 2.0);
    }

    #[test]
    fn cycles_are_rejected() {
        let tasks = vec![task(1, &[2]), task(2, &[1])];
        assert!(score_many(&tasks, |_| 1.0).is_err());
    }

    #[test]
    fn unary_ordering() {
        let cfg = ScoreConfig::default();
        let in_3_days = now() + ChronoDuration::days(3);
        let mk = |priority: u8, duration: Option<&str>, deadline: Option<DateTime<Utc>>| Task {
            priority,
            duration: duration.map(str::to_string),
            deadline,
            ..Task::default()
        };

        let ranked = [
            mk(0, Some("2h"), Some(in_3_days)),
            mk(5, Some("2h"), None),
            mk(0, None, Some(in_3_days)),
            mk(5, None, None),
            mk(3, Some("2h"), None),
            mk(3, None, None),
            mk(0, Some("2h"), None),
            mk(0, Some("15m"), None),
        ];

        let scores: Vec<f64> = ranked.iter().map(|t| score_at(t, now(), &cfg)).collect();
        for pair in scores.windows(2) {
            assert!(pair[0] > pair[1], "{scores:?}");
        }
    }

    #[test]
    fn duration_term_is_capped() {
        let cfg = ScoreConfig::default();
        let huge = Task {
            duration: Some("10000h".to_string()),
            ..Task::default()
        };
        assert_eq!(score_at(&huge, now(), &cfg), cfg.duration_cap);
    }

    #[test]
    fn deadline_term_drops_once_overdue() {
        let cfg = ScoreConfig::default();
        let due = |deadline| Task {
            priority: 1,
            deadline: Some(deadline),
            ..Task::default()
        };

        let overdue = score_at(&due(now() - ChronoDuration::hours(1)), now(), &cfg);
        assert!((overdue - 1.0).abs() < 1e-9, "{overdue}");

        let upcoming = score_at(&due(now() + ChronoDuration::hours(1)), now(), &cfg);
        assert!((upcoming - (1.0 + cfg.deadline_weight)).abs() < 1e-9, "{upcoming}");
    }

    #[test]
    fn postponed_task_scores_zero_but_inherits_from_dependents() {
        let cfg = ScoreConfig::default();
        let postponed = Task {
            id: 1,
            priority: 5,
            postponed_until: Some(now() + ChronoDuration::days(2)),
            ..Task::default()
        };
        assert_eq!(score_at(&postponed, now(), &cfg), 0.0);

        let blocked = Task {
            id: 2,
            priority: 4,
            dependencies: vec![Dependency::new(1)],
            ..Task::default()
        };
        let scores = score_many(&[postponed, blocked], unary_scorer(now(), cfg)).unwrap();
        assert_eq!(scores[&1], 4.0);
        assert_eq!(scores[&2], 4.0);
    }

    #[test]
    fn past_postponement_is_ignored() {
        let task = Task {
            priority: 2,
            postponed_until: Some(now() - ChronoDuration::days(1)),
            ..Task::default()
        };
        assert_eq!(score_at(&task, now(), &ScoreConfig::default()), 2.0);
    }
}
