// src/plan/mod.rs

//! "Tonight's plan": choosing what to work on within a time budget.
//!
//! - [`planning`] holds the persisted [`Planning`] value.
//! - [`planner`] selects and orders tasks, and backfills around a task the
//!   user wants to do later.

pub mod planner;
pub mod planning;

pub use planner::{
    do_later, do_later_with, filter_undone_dependencies, plan, plan_next, plan_with,
    sort_by_score,
};
pub use planning::Planning;
