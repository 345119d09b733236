// src/lifecycle.rs

//! Log-driven task lifecycle.
//!
//! A task has no stored status: whether it is started, paused, done or
//! abandoned is read off its log history. [`is_transition_allowed`] decides
//! whether a new entry of a given [`LogType`] may be appended right now.

use crate::errors::{Result, TonightError};
use crate::task::{Log, Task};
use crate::types::LogType;

fn is_completed(log: &Log) -> bool {
    log.completion == 100
}

/// Some entry reached 100%.
pub fn is_done(task: &Task) -> bool {
    task.log.iter().any(is_completed)
}

/// Some entry is a WONT_DO.
pub fn is_wont_do(task: &Task) -> bool {
    task.log.iter().any(|l| l.log_type == LogType::WontDo)
}

/// Some entry is a PAUSE.
pub fn is_paused(task: &Task) -> bool {
    task.log.iter().any(|l| l.log_type == LogType::Pause)
}

/// The most recent START has not been followed by a pause, a completion or
/// a WONT_DO.
pub fn is_started(task: &Task) -> bool {
    for log in task.log.iter().rev() {
        if is_completed(log) {
            return false;
        }
        match log.log_type {
            LogType::Start => return true,
            LogType::Pause | LogType::WontDo => return false,
            LogType::Progress | LogType::Comment | LogType::Postpone => {}
        }
    }
    false
}

/// Whether a log entry of type `log_type` may be appended to `task` now.
///
/// | new entry | requires                                 |
/// |-----------|------------------------------------------|
/// | START     | not done, not won't-do, not started      |
/// | PAUSE     | started                                  |
/// | WONT_DO   | not done, not won't-do                   |
/// | PROGRESS  | not done, not won't-do                   |
/// | COMMENT   | nothing                                  |
/// | POSTPONE  | nothing                                  |
pub fn is_transition_allowed(task: &Task, log_type: LogType) -> bool {
    match log_type {
        LogType::Start => !is_done(task) && !is_wont_do(task) && !is_started(task),
        LogType::Pause => is_started(task),
        LogType::WontDo | LogType::Progress => !is_done(task) && !is_wont_do(task),
        LogType::Comment | LogType::Postpone => true,
    }
}

/// [`is_transition_allowed`] as a `Result`, naming the task and log type on
/// rejection.
pub fn ensure_transition_allowed(task: &Task, log_type: LogType) -> Result<()> {
    if is_transition_allowed(task, log_type) {
        Ok(())
    } else {
        Err(TonightError::TransitionNotAllowed {
            task: task.id,
            log_type,
        })
    }
}
