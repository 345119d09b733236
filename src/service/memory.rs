// src/service/memory.rs

//! In-memory implementations of the service collaborators.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use chrono::Utc;
use tracing::debug;

use crate::errors::{Result, TonightError};
use crate::plan::Planning;
use crate::service::repository::{PlanningRepository, SearchParameters, TaskIndex, TaskRepository};
use crate::task::{Log, Task, TaskId};
use crate::types::{SortBy, Status};

/// Tasks kept in a map, with soft deletion.
///
/// Ids start at 1 and are never reused. Dependencies pointing at unknown or
/// deleted tasks are dropped from returned tasks; the others get the
/// referenced task's title and done flag.
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    tasks: BTreeMap<TaskId, Task>,
    deleted: BTreeSet<TaskId>,
    last_id: TaskId,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn live(&self, id: TaskId) -> Option<&Task> {
        if self.deleted.contains(&id) {
            return None;
        }
        self.tasks.get(&id)
    }

    fn live_mut(&mut self, id: TaskId) -> Result<&mut Task> {
        if self.deleted.contains(&id) {
            return Err(TonightError::TaskNotFound(id));
        }
        self.tasks.get_mut(&id).ok_or(TonightError::TaskNotFound(id))
    }

    fn resolved(&self, task: &Task) -> Task {
        let mut task = task.clone();
        task.dependencies = task
            .dependencies
            .into_iter()
            .filter_map(|mut dep| {
                let target = self.live(dep.id)?;
                dep.done = target.status() == Status::Done;
                dep.title = target.title.clone();
                Some(dep)
            })
            .collect();
        task
    }

    fn neighbours(&self, id: TaskId) -> Vec<TaskId> {
        let mut out: Vec<TaskId> = self
            .live(id)
            .map(|t| t.dependencies.iter().map(|d| d.id).collect())
            .unwrap_or_default();

        out.extend(
            self.tasks
                .values()
                .filter(|t| !self.deleted.contains(&t.id) && t.depends_on(id))
                .map(|t| t.id),
        );
        out.retain(|n| self.live(*n).is_some());
        out
    }
}

impl TaskRepository for MemoryTaskStore {
    fn list(&self, ids: &[TaskId]) -> Result<Vec<Task>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.live(*id))
            .map(|t| self.resolved(t))
            .collect())
    }

    fn create(&mut self, task: &mut Task) -> Result<()> {
        self.last_id += 1;
        let now = Utc::now();

        task.id = self.last_id;
        task.created_at = now;
        task.updated_at = now;
        self.tasks.insert(task.id, task.clone());
        Ok(())
    }

    fn update(&mut self, task: &Task) -> Result<()> {
        let stored = self.live_mut(task.id)?;
        *stored = task.clone();
        Ok(())
    }

    fn append_log(&mut self, task_id: TaskId, log: Log) -> Result<()> {
        let stored = self.live_mut(task_id)?;
        stored.updated_at = log.created_at;
        stored.log.push(log);
        Ok(())
    }

    fn update_ranks(&mut self, ranks: &HashMap<TaskId, u32>) -> Result<()> {
        for (&id, &rank) in ranks {
            self.live_mut(id)?.rank = rank;
        }
        Ok(())
    }

    fn dependency_closure(&self, task_id: TaskId) -> Result<Vec<Task>> {
        if self.live(task_id).is_none() {
            return Err(TonightError::TaskNotFound(task_id));
        }

        let mut seen = BTreeSet::from([task_id]);
        let mut queue = VecDeque::from([task_id]);
        while let Some(id) = queue.pop_front() {
            for next in self.neighbours(id) {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        let ids: Vec<TaskId> = seen.into_iter().collect();
        debug!(task = task_id, size = ids.len(), "dependency closure");
        self.list(&ids)
    }

    fn delete(&mut self, task_id: TaskId) -> Result<()> {
        self.live_mut(task_id)?;
        self.deleted.insert(task_id);
        Ok(())
    }

    fn all(&self) -> Result<Vec<Task>> {
        Ok(self
            .tasks
            .values()
            .filter(|t| !self.deleted.contains(&t.id))
            .map(|t| self.resolved(t))
            .collect())
    }
}

#[derive(Debug, Clone)]
struct IndexedTask {
    words: Vec<String>,
    tags: BTreeSet<String>,
    status: Status,
    score: f64,
    rank: u32,
}

fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}

impl IndexedTask {
    fn matches_term(&self, term: &str) -> bool {
        if let Some(tag) = term.strip_prefix('#') {
            return tag.is_empty() || self.tags.contains(tag);
        }
        words(term).all(|piece| self.words.iter().any(|w| w.starts_with(&piece)))
    }

    fn matches(&self, params: &SearchParameters) -> bool {
        (params.statuses.is_empty() || params.statuses.contains(&self.status))
            && params.q.split_whitespace().all(|term| self.matches_term(term))
    }
}

/// Naive search over title, description and tags.
///
/// Query terms must all match: `#tag` matches a tag exactly, any other term
/// is a case-insensitive prefix of some word of the title or description.
#[derive(Debug, Default)]
pub struct MemoryTaskIndex {
    docs: BTreeMap<TaskId, IndexedTask>,
}

impl MemoryTaskIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score the task was last indexed with.
    pub fn score_of(&self, id: TaskId) -> Option<f64> {
        self.docs.get(&id).map(|d| d.score)
    }
}

impl TaskIndex for MemoryTaskIndex {
    fn search(&self, params: &SearchParameters) -> Result<Vec<TaskId>> {
        let mut hits: Vec<(TaskId, &IndexedTask)> = self
            .docs
            .iter()
            .filter(|(id, _)| params.ids.as_ref().is_none_or(|ids| ids.contains(*id)))
            .filter(|(_, doc)| doc.matches(params))
            .map(|(id, doc)| (*id, doc))
            .collect();

        match params.sort_by {
            SortBy::Rank => hits.sort_by_key(|(id, doc)| (doc.rank, *id)),
            SortBy::Score => hits.sort_by(|(a_id, a), (b_id, b)| {
                b.score
                    .total_cmp(&a.score)
                    .then(a.rank.cmp(&b.rank))
                    .then(a_id.cmp(b_id))
            }),
        }

        debug!(q = %params.q, hits = hits.len(), "searched index");
        Ok(hits.into_iter().map(|(id, _)| id).collect())
    }

    fn index(&mut self, task: &Task) -> Result<()> {
        let doc = IndexedTask {
            words: words(&task.title).chain(words(&task.description)).collect(),
            tags: task.tags.clone(),
            status: task.status(),
            score: task.score,
            rank: task.rank,
        };
        self.docs.insert(task.id, doc);
        Ok(())
    }

    fn delete(&mut self, task_id: TaskId) -> Result<()> {
        self.docs.remove(&task_id);
        Ok(())
    }
}

/// Keeps every planning; the last one not dismissed is the active one.
#[derive(Debug, Default)]
pub struct MemoryPlanningStore {
    plannings: Vec<Planning>,
}

impl MemoryPlanningStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn active_mut(&mut self) -> Option<&mut Planning> {
        self.plannings.iter_mut().rev().find(|p| !p.dismissed)
    }
}

impl PlanningRepository for MemoryPlanningStore {
    fn get(&self) -> Result<Option<Planning>> {
        Ok(self.plannings.iter().rev().find(|p| !p.dismissed).cloned())
    }

    fn create(&mut self, planning: &mut Planning) -> Result<()> {
        if let Some(previous) = self.active_mut() {
            previous.dismissed = true;
        }
        planning.id = self.plannings.len() as u64 + 1;
        planning.dismissed = false;
        self.plannings.push(planning.clone());
        Ok(())
    }

    fn update(&mut self, planning: &Planning) -> Result<()> {
        let stored = self
            .active_mut()
            .filter(|p| p.id == planning.id)
            .ok_or(TonightError::NoActivePlanning)?;
        *stored = planning.clone();
        Ok(())
    }

    fn dismiss(&mut self) -> Result<()> {
        match self.active_mut() {
            Some(active) => active.dismissed = true,
            None => debug!("no active planning to dismiss"),
        }
        Ok(())
    }
}
