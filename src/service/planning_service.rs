// src/service/planning_service.rs

use chrono::Utc;
use tracing::info;

use crate::config::PlannerConfig;
use crate::errors::{Result, TonightError};
use crate::parse::{PlanningRequest, parse_planning};
use crate::plan::{Planning, do_later_with, plan_with};
use crate::service::repository::{PlanningRepository, SearchParameters, TaskIndex, TaskRepository};
use crate::service::task_service::TaskService;
use crate::task::{Task, TaskId};

/// Creates and maintains the active planning.
///
/// Candidate tasks are the pending search hits for the planning query, loaded
/// through a [`TaskService`] so their dependency flags and scores are current.
#[derive(Debug)]
pub struct PlanningService<P> {
    repo: P,
    planner: PlannerConfig,
}

impl<P: PlanningRepository> PlanningService<P> {
    pub fn new(repo: P) -> Self {
        Self::with_config(repo, PlannerConfig::default())
    }

    pub fn with_config(repo: P, planner: PlannerConfig) -> Self {
        Self { repo, planner }
    }

    pub fn repository(&self) -> &P {
        &self.repo
    }

    /// The active planning with fresh copies of its tasks.
    ///
    /// Once every planned task is done or abandoned, a new planning is made
    /// with the same request and returned instead.
    pub fn current<R, I>(&mut self, tasks: &TaskService<R, I>) -> Result<Option<Planning>>
    where
        R: TaskRepository,
        I: TaskIndex,
    {
        let Some(mut planning) = self.repo.get()? else {
            return Ok(None);
        };
        planning.tasks = tasks.repository().list(&planning.task_ids())?;

        if !planning.tasks.is_empty() && planning.is_done() {
            let request = planning.request();
            info!(planning = planning.id, request = %request, "planning finished; planning again");
            return self.plan_request(tasks, &request).map(Some);
        }

        Ok(Some(planning))
    }

    /// Plan from `[<query> for ][!]<duration>` input.
    pub fn plan<R, I>(&mut self, tasks: &TaskService<R, I>, input: &str) -> Result<Planning>
    where
        R: TaskRepository,
        I: TaskIndex,
    {
        let request = parse_planning(input)?;
        self.plan_request(tasks, &request)
    }

    pub fn plan_request<R, I>(
        &mut self,
        tasks: &TaskService<R, I>,
        request: &PlanningRequest,
    ) -> Result<Planning>
    where
        R: TaskRepository,
        I: TaskIndex,
    {
        let candidates = Self::candidates(tasks, &request.q)?;
        let planned = plan_with(candidates, request.duration, request.strict, &self.planner);

        let mut planning = Planning::new(request, planned, Utc::now());
        self.repo.create(&mut planning)?;
        info!(
            planning = planning.id,
            request = %request,
            tasks = planning.tasks.len(),
            "created planning"
        );
        Ok(planning)
    }

    /// Remove `task_id` from the active planning and backfill the freed time.
    pub fn do_later<R, I>(&mut self, tasks: &TaskService<R, I>, task_id: TaskId) -> Result<Planning>
    where
        R: TaskRepository,
        I: TaskIndex,
    {
        let planning = self.current(tasks)?.ok_or(TonightError::NoActivePlanning)?;
        let candidates = Self::candidates(tasks, &planning.q)?;

        let updated = do_later_with(&planning, candidates, task_id, &self.planner);
        self.repo.update(&updated)?;
        info!(planning = updated.id, task = task_id, "task pushed to later");
        Ok(updated)
    }

    pub fn dismiss(&mut self) -> Result<()> {
        self.repo.dismiss()?;
        info!("planning dismissed");
        Ok(())
    }

    fn candidates<R, I>(tasks: &TaskService<R, I>, q: &str) -> Result<Vec<Task>>
    where
        R: TaskRepository,
        I: TaskIndex,
    {
        let ids = tasks.index().search(&SearchParameters::pending(q))?;
        tasks.repository().list(&ids)
    }
}
