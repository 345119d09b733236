// src/parse/mod.rs

//! Free-text input parsing.
//!
//! - [`task_input`]: one line of text into a [`Task`](crate::task::Task).
//! - [`log_input`]: one line of text into a [`Log`](crate::task::Log).
//! - [`planning_input`]: `"[<query> for ][!]<duration>"` into a
//!   [`PlanningRequest`].
//!
//! All patterns are compiled once, on first use, and never mutated.

pub mod log_input;
pub mod planning_input;
pub mod task_input;

pub use log_input::parse_log;
pub use planning_input::{PlanningRequest, parse_planning};
pub use task_input::parse;
