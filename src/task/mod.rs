// src/task/mod.rs

//! Task data model.
//!
//! - [`model`] holds `Task`, `Log` and `Dependency`.
//! - [`duration`] parses and formats elapsed-time expressions (`"2h30m"`).

pub mod duration;
pub mod model;

pub use duration::{format_duration, parse_duration};
pub use model::{Dependency, Log, Task, TaskId};
