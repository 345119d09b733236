use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of a log entry appended to a task.
///
/// The set is closed: the lifecycle state machine matches on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogType {
    Start,
    Pause,
    Progress,
    WontDo,
    Comment,
    Postpone,
}

impl LogType {
    pub const ALL: [LogType; 6] = [
        LogType::Start,
        LogType::Pause,
        LogType::Progress,
        LogType::WontDo,
        LogType::Comment,
        LogType::Postpone,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogType::Start => "START",
            LogType::Pause => "PAUSE",
            LogType::Progress => "PROGRESS",
            LogType::WontDo => "WONT_DO",
            LogType::Comment => "COMMENT",
            LogType::Postpone => "POSTPONE",
        }
    }
}

impl fmt::Display for LogType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "START" => Ok(LogType::Start),
            "PAUSE" => Ok(LogType::Pause),
            "PROGRESS" => Ok(LogType::Progress),
            "WONT_DO" => Ok(LogType::WontDo),
            "COMMENT" => Ok(LogType::Comment),
            "POSTPONE" => Ok(LogType::Postpone),
            other => Err(format!("invalid log type: {other}")),
        }
    }
}

/// Derived completion status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Pending,
    Done,
    WontDo,
}

impl Status {
    /// Done and won't-do are terminal; nothing can follow them but comments.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Status::Pending)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Pending => f.write_str("pending"),
            Status::Done => f.write_str("done"),
            Status::WontDo => f.write_str("won't do"),
        }
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Status::Pending),
            "done" => Ok(Status::Done),
            "won't do" | "wont_do" | "wont-do" => Ok(Status::WontDo),
            other => Err(format!(
                "invalid status: {other} (expected \"pending\", \"done\" or \"won't do\")"
            )),
        }
    }
}

/// Ordering applied by the task index when listing search results.
///
/// - `Rank`: manual rank ascending (default; the order users curate by hand).
/// - `Score`: urgency score descending, rank as tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Rank,
    Score,
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "rank" => Ok(SortBy::Rank),
            "score" => Ok(SortBy::Score),
            other => Err(format!(
                "invalid sort order: {other} (expected \"rank\" or \"score\")"
            )),
        }
    }
}
