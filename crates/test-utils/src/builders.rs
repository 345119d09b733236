#![allow(dead_code)]

use chrono::{DateTime, Utc};
use tonight::task::{Dependency, Log, Task, TaskId};
use tonight::types::LogType;

/// Builder for `Task` to simplify test setup.
pub struct TaskBuilder {
    task: Task,
}

impl TaskBuilder {
    pub fn new(id: TaskId) -> Self {
        Self {
            task: Task {
                id,
                title: format!("task {id}"),
                ..Task::default()
            },
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.task.title = title.to_string();
        self
    }

    pub fn priority(mut self, priority: u8) -> Self {
        self.task.priority = priority;
        self
    }

    pub fn rank(mut self, rank: u32) -> Self {
        self.task.rank = rank;
        self
    }

    pub fn tag(mut self, tag: &str) -> Self {
        self.task.tags.insert(tag.to_string());
        self
    }

    pub fn duration(mut self, duration: &str) -> Self {
        self.task.duration = Some(duration.to_string());
        self
    }

    pub fn deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.task.deadline = Some(deadline);
        self
    }

    pub fn postponed_until(mut self, until: DateTime<Utc>) -> Self {
        self.task.postponed_until = Some(until);
        self
    }

    pub fn score(mut self, score: f64) -> Self {
        self.task.score = score;
        self
    }

    /// Add a dependency with an explicit done flag.
    pub fn needs(mut self, id: TaskId, done: bool) -> Self {
        self.task.dependencies.push(Dependency {
            id,
            done,
            title: format!("task {id}"),
        });
        self
    }

    pub fn log(mut self, log: Log) -> Self {
        self.task.log.push(log);
        self
    }

    pub fn build(self) -> Task {
        self.task
    }
}

/// Builder for `Log`.
pub struct LogBuilder {
    log: Log,
}

impl LogBuilder {
    pub fn new(log_type: LogType) -> Self {
        Self {
            log: Log::new(log_type, 0, ""),
        }
    }

    pub fn progress(completion: u8) -> Self {
        Self::new(LogType::Progress).completion(completion)
    }

    pub fn completion(mut self, completion: u8) -> Self {
        self.log.completion = completion.min(100);
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.log.description = description.to_string();
        self
    }

    pub fn at(mut self, created_at: DateTime<Utc>) -> Self {
        self.log.created_at = created_at;
        self
    }

    pub fn build(self) -> Log {
        self.log
    }
}
