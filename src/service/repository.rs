// src/service/repository.rs

use std::collections::HashMap;

use crate::errors::Result;
use crate::plan::Planning;
use crate::task::{Log, Task, TaskId};
use crate::types::{SortBy, Status};

/// Task persistence.
///
/// Tasks returned by `list`, `all` and `dependency_closure` have their
/// dependencies resolved: each [`Dependency`](crate::task::Dependency)
/// carries the referenced task's title and whether it is done. Soft-deleted
/// tasks are never returned.
pub trait TaskRepository {
    /// Tasks with the given ids, in that order; unknown ids are skipped.
    fn list(&self, ids: &[TaskId]) -> Result<Vec<Task>>;

    /// Store a new task, assigning its id and timestamps.
    fn create(&mut self, task: &mut Task) -> Result<()>;

    /// Replace a stored task.
    fn update(&mut self, task: &Task) -> Result<()>;

    fn append_log(&mut self, task_id: TaskId, log: Log) -> Result<()>;

    fn update_ranks(&mut self, ranks: &HashMap<TaskId, u32>) -> Result<()>;

    /// Every task connected to `task_id` through dependency edges, in either
    /// direction, `task_id` included.
    fn dependency_closure(&self, task_id: TaskId) -> Result<Vec<Task>>;

    /// Soft delete: the task disappears from every listing.
    fn delete(&mut self, task_id: TaskId) -> Result<()>;

    fn all(&self) -> Result<Vec<Task>>;
}

/// What to look for in the [`TaskIndex`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchParameters {
    /// Free-text query; empty matches everything.
    pub q: String,
    /// Accepted statuses; empty accepts all.
    pub statuses: Vec<Status>,
    /// Restrict results to these ids when set.
    pub ids: Option<Vec<TaskId>>,
    pub sort_by: SortBy,
}

impl SearchParameters {
    pub fn pending(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            statuses: vec![Status::Pending],
            ..Self::default()
        }
    }
}

/// Search index over tasks.
///
/// `index` must be given tasks carrying a freshly computed `score`.
pub trait TaskIndex {
    fn search(&self, params: &SearchParameters) -> Result<Vec<TaskId>>;

    fn index(&mut self, task: &Task) -> Result<()>;

    fn delete(&mut self, task_id: TaskId) -> Result<()>;
}

/// Storage of the active planning.
pub trait PlanningRepository {
    /// The active (not dismissed) planning, if any.
    fn get(&self) -> Result<Option<Planning>>;

    /// Store a new planning, assigning its id. It replaces any active one.
    fn create(&mut self, planning: &mut Planning) -> Result<()>;

    fn update(&mut self, planning: &Planning) -> Result<()>;

    fn dismiss(&mut self) -> Result<()>;
}
