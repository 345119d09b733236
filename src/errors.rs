// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

use crate::task::TaskId;
use crate::types::LogType;

#[derive(Error, Debug)]
pub enum TonightError {
    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("Invalid planning input: {0}")]
    InvalidPlanning(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Log type {log_type} not allowed for task {task} right now")]
    TransitionNotAllowed { task: TaskId, log_type: LogType },

    #[error("Cycle detected in task dependencies: {0}")]
    DependencyCycle(String),

    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("No active planning")]
    NoActivePlanning,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, TonightError>;
