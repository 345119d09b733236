#![allow(dead_code)]

use std::time::Duration;

use tonight::task::{Task, TaskId};

pub use tonight_test_utils::{init_tracing, memory_services};

pub const MINUTE: Duration = Duration::from_secs(60);

pub fn ids(tasks: &[Task]) -> Vec<TaskId> {
    tasks.iter().map(|t| t.id).collect()
}

/// Completions of the log entries, in log order.
pub fn completions(task: &Task) -> Vec<u8> {
    task.log.iter().map(|l| l.completion).collect()
}
