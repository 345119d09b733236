// src/service/task_service.rs

use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, NaiveTime, Utc};
use tracing::{debug, info, warn};

use crate::config::ScoreConfig;
use crate::dag::{DependencyGraph, score_many, unary_scorer};
use crate::errors::{Result, TonightError};
use crate::lifecycle::ensure_transition_allowed;
use crate::parse::{parse, parse_log};
use crate::service::repository::{SearchParameters, TaskIndex, TaskRepository};
use crate::task::{Log, Task, TaskId, format_duration, parse_duration};
use crate::types::{LogType, SortBy, Status};

/// Task use cases on top of a repository and a search index.
///
/// Every operation validates its input and the requested transition before
/// writing anything. Every write then re-scores the dependency closure of the
/// touched tasks and pushes the fresh scores to the repository and the index.
#[derive(Debug)]
pub struct TaskService<R, I> {
    repo: R,
    index: I,
    score: ScoreConfig,
}

impl<R: TaskRepository, I: TaskIndex> TaskService<R, I> {
    pub fn new(repo: R, index: I) -> Self {
        Self::with_config(repo, index, ScoreConfig::default())
    }

    pub fn with_config(repo: R, index: I, score: ScoreConfig) -> Self {
        Self { repo, index, score }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn index(&self) -> &I {
        &self.index
    }

    pub fn get(&self, id: TaskId) -> Result<Task> {
        self.repo
            .list(&[id])?
            .into_iter()
            .next()
            .ok_or(TonightError::TaskNotFound(id))
    }

    /// Search the index, then load the hits in index order.
    pub fn list(&self, q: &str, statuses: &[Status], sort_by: SortBy) -> Result<Vec<Task>> {
        let params = SearchParameters {
            q: q.to_string(),
            statuses: statuses.to_vec(),
            ids: None,
            sort_by,
        };
        let ids = self.index.search(&params)?;
        self.repo.list(&ids)
    }

    pub fn create(&mut self, input: &str) -> Result<Task> {
        let mut task = parse(input)?;
        self.drop_unknown_dependencies(&mut task)?;

        self.repo.create(&mut task)?;
        info!(task = task.id, title = %task.title, "created task");

        self.rescore(&[task.id])?;
        self.get(task.id)
    }

    /// Replace the parsed fields of a task, keeping its log, rank,
    /// postponement and creation time.
    pub fn update(&mut self, id: TaskId, input: &str) -> Result<Task> {
        let existing = self.get(id)?;
        let parsed = parse(input)?;

        let mut task = Task {
            id,
            rank: existing.rank,
            postponed_until: existing.postponed_until,
            score: existing.score,
            log: existing.log.clone(),
            created_at: existing.created_at,
            updated_at: Utc::now(),
            ..parsed
        };
        self.drop_unknown_dependencies(&mut task)?;
        self.ensure_acyclic_with(&task)?;

        self.repo.update(&task)?;
        info!(task = id, "updated task");

        // Former prerequisites may have left the closure.
        let mut touched: Vec<TaskId> = existing.dependencies.iter().map(|d| d.id).collect();
        touched.push(id);
        self.rescore(&touched)?;
        self.get(id)
    }

    /// Append a log entry parsed from `input`.
    pub fn log(&mut self, id: TaskId, input: &str) -> Result<Task> {
        let entry = parse_log(input);
        let task = self.get(id)?;
        ensure_transition_allowed(&task, entry.log_type)?;

        self.append(task, entry)
    }

    /// Hide a task from scoring until `date` (`YYYY-MM-DD`, midnight UTC).
    pub fn postpone(&mut self, id: TaskId, date: &str) -> Result<Task> {
        let day = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .map_err(|e| TonightError::InvalidDate(format!("{date}: {e}")))?;
        let mut task = self.get(id)?;
        ensure_transition_allowed(&task, LogType::Postpone)?;

        task.postponed_until = Some(day.and_time(NaiveTime::MIN).and_utc());
        task.updated_at = Utc::now();
        self.repo.update(&task)?;

        let entry = Log::new(LogType::Postpone, 0, format!("postponed until {day}"));
        self.append(task, entry)
    }

    /// Set a new duration and record the change as a comment.
    pub fn change_duration(&mut self, id: TaskId, token: &str) -> Result<Task> {
        let parsed = parse_duration(token.trim())?;
        let mut task = self.get(id)?;
        ensure_transition_allowed(&task, LogType::Comment)?;

        let canonical = format_duration(parsed);
        let old = task.duration.clone().unwrap_or_else(|| "(none)".to_string());
        let new = if canonical.is_empty() {
            "(none)".to_string()
        } else {
            canonical.clone()
        };

        task.duration = (!canonical.is_empty()).then_some(canonical);
        task.updated_at = Utc::now();
        self.repo.update(&task)?;

        let entry = Log::new(
            LogType::Comment,
            0,
            format!("duration updated: {old} -> {new}"),
        );
        self.append(task, entry)
    }

    pub fn update_ranks(&mut self, ranks: &HashMap<TaskId, u32>) -> Result<()> {
        let ids: Vec<TaskId> = ranks.keys().copied().collect();
        let found = self.repo.list(&ids)?;
        if let Some(&missing) = ids.iter().find(|id| !found.iter().any(|t| t.id == **id)) {
            return Err(TonightError::TaskNotFound(missing));
        }

        self.repo.update_ranks(ranks)?;
        info!(tasks = ranks.len(), "updated ranks");
        self.rescore(&ids)
    }

    /// Soft-delete a task and drop it from the index.
    pub fn delete(&mut self, id: TaskId) -> Result<()> {
        let neighbours: Vec<TaskId> = self
            .repo
            .dependency_closure(id)?
            .into_iter()
            .map(|t| t.id)
            .filter(|&other| other != id)
            .collect();

        self.repo.delete(id)?;
        self.index.delete(id)?;
        info!(task = id, "deleted task");

        self.rescore(&neighbours)
    }

    /// Re-score every live task from the current clock and push the scores to
    /// the repository and the index.
    ///
    /// Scores only change on writes, so a postponement or deadline that passes
    /// in between leaves them stale until this runs.
    pub fn reindex_all(&mut self) -> Result<usize> {
        let tasks = self.repo.all()?;
        let scores = score_many(&tasks, unary_scorer(Utc::now(), self.score))?;

        for mut task in tasks {
            task.score = scores.get(&task.id).copied().unwrap_or_default();
            self.repo.update(&task)?;
            self.index.index(&task)?;
        }

        info!(tasks = scores.len(), "reindexed all tasks");
        Ok(scores.len())
    }

    /// Clamp, store and propagate a log entry whose transition was already
    /// checked against `task`.
    fn append(&mut self, task: Task, mut entry: Log) -> Result<Task> {
        task.clamp_completion(&mut entry);
        info!(
            task = task.id,
            log_type = %entry.log_type,
            completion = entry.completion,
            "logged"
        );

        self.repo.append_log(task.id, entry)?;
        self.rescore(&[task.id])?;
        self.get(task.id)
    }

    fn drop_unknown_dependencies(&self, task: &mut Task) -> Result<()> {
        let wanted: Vec<TaskId> = task.dependencies.iter().map(|d| d.id).collect();
        if wanted.is_empty() {
            return Ok(());
        }

        let known: Vec<TaskId> = self.repo.list(&wanted)?.iter().map(|t| t.id).collect();
        task.dependencies.retain(|dep| {
            let keep = known.contains(&dep.id);
            if !keep {
                warn!(task = task.id, dependency = dep.id, "ignoring unknown dependency");
            }
            keep
        });
        Ok(())
    }

    fn ensure_acyclic_with(&self, task: &Task) -> Result<()> {
        let mut tasks = self.repo.all()?;
        match tasks.iter_mut().find(|t| t.id == task.id) {
            Some(slot) => *slot = task.clone(),
            None => tasks.push(task.clone()),
        }
        DependencyGraph::from_tasks(&tasks).ensure_acyclic()
    }

    /// Re-score the union of the dependency closures of `ids`, then store and
    /// index every task of it. Unknown or deleted ids are skipped.
    fn rescore(&mut self, ids: &[TaskId]) -> Result<()> {
        let mut closure: BTreeMap<TaskId, Task> = BTreeMap::new();
        for &id in ids {
            if closure.contains_key(&id) {
                continue;
            }
            match self.repo.dependency_closure(id) {
                Ok(tasks) => closure.extend(tasks.into_iter().map(|t| (t.id, t))),
                Err(TonightError::TaskNotFound(_)) => {
                    debug!(task = id, "skipping rescore of missing task");
                }
                Err(err) => return Err(err),
            }
        }

        let tasks: Vec<Task> = closure.into_values().collect();
        let scores = score_many(&tasks, unary_scorer(Utc::now(), self.score))?;

        for mut task in tasks {
            task.score = scores.get(&task.id).copied().unwrap_or_default();
            self.repo.update(&task)?;
            self.index.index(&task)?;
        }

        debug!(tasks = scores.len(), "rescored dependency closure");
        Ok(())
    }
}
