// src/lib.rs

//! Personal task planning engine.
//!
//! Tasks are typed as free text (`"!!Title: details #tag ~2h >2024-05-01
//! needs:3"`), move through a lifecycle driven by their log history, and get
//! an urgency score that flows from dependents to their prerequisites. A
//! planner picks the most urgent ready tasks that fit a time budget; a task
//! can later be pushed out of the planning and the freed time backfilled.
//!
//! The core (`parse`, `lifecycle`, `dag`, `plan`) is pure and synchronous.
//! The `service` module orchestrates it over repository and index traits,
//! with in-memory implementations.

pub mod config;
pub mod dag;
pub mod errors;
pub mod lifecycle;
pub mod logging;
pub mod parse;
pub mod plan;
pub mod service;
pub mod task;
pub mod types;

pub use dag::{score, score_many};
pub use errors::{Result, TonightError};
pub use lifecycle::is_transition_allowed;
pub use parse::{PlanningRequest, parse, parse_log, parse_planning};
pub use plan::{Planning, do_later, plan};
pub use task::{Dependency, Log, Task, TaskId};
pub use types::{LogType, SortBy, Status};
