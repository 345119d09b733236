// src/plan/planning.rs

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::parse::PlanningRequest;
use crate::task::{Task, TaskId};

/// A time-boxed, ordered selection of tasks.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Planning {
    pub id: u64,

    /// Query the candidate tasks were searched with.
    pub q: String,
    /// Time budget.
    pub duration: Duration,
    pub strict: bool,

    pub dismissed: bool,
    pub started_at: DateTime<Utc>,

    pub tasks: Vec<Task>,
}

impl Planning {
    pub fn new(request: &PlanningRequest, tasks: Vec<Task>, started_at: DateTime<Utc>) -> Self {
        Self {
            q: request.q.clone(),
            duration: request.duration,
            strict: request.strict,
            started_at,
            tasks,
            ..Self::default()
        }
    }

    /// The request this planning answers, e.g. to plan again with it.
    pub fn request(&self) -> PlanningRequest {
        PlanningRequest {
            q: self.q.clone(),
            duration: self.duration,
            strict: self.strict,
        }
    }

    /// Every planned task is done or won't be done.
    pub fn is_done(&self) -> bool {
        self.tasks.iter().all(|t| t.status().is_terminal())
    }

    /// Time still needed for the planned tasks.
    pub fn total_duration(&self, default: Duration) -> Duration {
        self.tasks.iter().map(|t| t.left_duration(default)).sum()
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|t| t.id == id)
    }

    pub fn task_ids(&self) -> Vec<TaskId> {
        self.tasks.iter().map(|t| t.id).collect()
    }
}
