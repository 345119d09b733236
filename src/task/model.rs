// src/task/model.rs

use std::collections::BTreeSet;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::duration::parse_duration;
use crate::types::{LogType, Status};

/// Identifier of a task.
pub type TaskId = u64;

/// A unit of work with priority, tags, optional duration/deadline and a log
/// history.
///
/// The status of a task is never stored: it is derived from `log`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,

    /// 0 (none) to 5 (highest), from the leading `!` of the input.
    pub priority: u8,
    /// Manual ordering, used as a search tie-break.
    pub rank: u32,
    pub tags: BTreeSet<String>,

    /// Canonical elapsed-time string, e.g. `"2h30m"`.
    pub duration: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub postponed_until: Option<DateTime<Utc>>,

    /// Derived urgency; never set from user input.
    pub score: f64,

    pub log: Vec<Log>,
    pub dependencies: Vec<Dependency>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Highest completion recorded in the log (0 when nothing was logged).
    pub fn completion(&self) -> u8 {
        self.log.iter().map(|l| l.completion).max().unwrap_or(0)
    }

    /// Derived status: the first terminal entry of the log decides.
    pub fn status(&self) -> Status {
        for log in &self.log {
            if log.completion == 100 {
                return Status::Done;
            }
            if log.log_type == LogType::WontDo {
                return Status::WontDo;
            }
        }
        Status::Pending
    }

    /// When the task reached a terminal status, if it did.
    pub fn done_at(&self) -> Option<DateTime<Utc>> {
        self.log
            .iter()
            .find(|l| l.completion == 100 || l.log_type == LogType::WontDo)
            .map(|l| l.created_at)
    }

    /// The task duration, if set and parseable.
    pub fn parsed_duration(&self) -> Option<Duration> {
        self.duration
            .as_deref()
            .and_then(|d| parse_duration(d).ok())
    }

    /// Time still needed: `(100 - completion)% of duration`.
    ///
    /// `default` stands in for a missing or unparseable duration.
    pub fn left_duration(&self, default: Duration) -> Duration {
        let total = self.parsed_duration().unwrap_or(default);
        let left = u128::from(100 - self.completion().min(100));
        let nanos = total.as_nanos() * left / 100;
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }

    pub fn is_postponed_at(&self, now: DateTime<Utc>) -> bool {
        self.postponed_until.is_some_and(|until| until > now)
    }

    /// Raise `log.completion` to the highest completion already recorded, so
    /// that completion never goes down across the history.
    pub fn clamp_completion(&self, log: &mut Log) {
        log.completion = log.completion.max(self.completion());
    }

    pub fn depends_on(&self, id: TaskId) -> bool {
        self.dependencies.iter().any(|d| d.id == id)
    }
}

/// An immutable, timestamped record of progress or state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Log {
    #[serde(rename = "type")]
    pub log_type: LogType,
    /// Percentage in `0..=100`.
    pub completion: u8,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Log {
    pub fn new(log_type: LogType, completion: u8, description: impl Into<String>) -> Self {
        Self {
            log_type,
            completion: completion.min(100),
            description: description.into(),
            created_at: Utc::now(),
        }
    }
}

/// A "needs" edge stored on the dependent task.
///
/// `done` and `title` are resolved by whoever loads the task; the planning
/// core trusts them as given.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dependency {
    pub id: TaskId,
    pub done: bool,
    pub title: String,
}

impl Dependency {
    pub fn new(id: TaskId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn log(log_type: LogType, completion: u8) -> Log {
        Log::new(log_type, completion, "")
    }

    #[test]
    fn completion_is_the_maximum_logged() {
        let task = Task {
            log: vec![
                log(LogType::Progress, 40),
                log(LogType::Comment, 0),
                log(LogType::Progress, 20),
            ],
            ..Task::default()
        };
        assert_eq!(task.completion(), 40);

        let mut next = log(LogType::Progress, 10);
        task.clamp_completion(&mut next);
        assert_eq!(next.completion, 40);
    }

    #[test]
    fn status_uses_first_terminal_entry() {
        let done_then_abandoned = Task {
            log: vec![log(LogType::Progress, 100), log(LogType::WontDo, 0)],
            ..Task::default()
        };
        assert_eq!(done_then_abandoned.status(), Status::Done);

        let abandoned = Task {
            log: vec![log(LogType::Start, 0), log(LogType::WontDo, 0)],
            ..Task::default()
        };
        assert_eq!(abandoned.status(), Status::WontDo);
        assert!(abandoned.done_at().is_some());

        assert_eq!(Task::default().status(), Status::Pending);
        assert_eq!(Task::default().done_at(), None);
    }

    #[test]
    fn left_duration_scales_with_completion() {
        let hour = Duration::from_secs(3600);
        let task = Task {
            duration: Some("2h".to_string()),
            log: vec![log(LogType::Progress, 25)],
            ..Task::default()
        };
        assert_eq!(task.left_duration(hour), Duration::from_secs(90 * 60));

        let unknown = Task {
            duration: Some("soon".to_string()),
            ..Task::default()
        };
        assert_eq!(unknown.left_duration(hour), hour);
    }

    #[test]
    fn postponement_is_relative_to_now() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let task = Task {
            postponed_until: Some(Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap()),
            ..Task::default()
        };
        assert!(task.is_postponed_at(now));
        assert!(!task.is_postponed_at(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()));
    }
}
