// src/service/mod.rs

//! Orchestration around the pure planning core.
//!
//! - [`repository`] defines the persistence and search collaborators as
//!   traits.
//! - [`memory`] implements them in memory.
//! - [`task_service`] creates, updates, logs and deletes tasks, keeping the
//!   index scores fresh.
//! - [`planning_service`] creates and maintains the active planning.

pub mod memory;
pub mod planning_service;
pub mod repository;
pub mod task_service;

pub use memory::{MemoryPlanningStore, MemoryTaskIndex, MemoryTaskStore};
pub use planning_service::PlanningService;
pub use repository::{PlanningRepository, SearchParameters, TaskIndex, TaskRepository};
pub use task_service::TaskService;
