// src/parse/planning_input.rs

use std::fmt;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use crate::errors::{Result, TonightError};
use crate::task::{format_duration, parse_duration};

static PLANNING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(.*) for )?(!)?([0-9a-zA-Z]+)$").expect("planning pattern is valid")
});

/// A request for a planning: which tasks, how much time, how strictly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanningRequest {
    /// Free-text search query selecting candidate tasks; empty for all.
    pub q: String,
    /// Time budget.
    pub duration: Duration,
    /// Never exceed the budget when `true`.
    pub strict: bool,
}

impl fmt::Display for PlanningRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.q.is_empty() {
            write!(f, "{} for ", self.q)?;
        }
        if self.strict {
            f.write_str("!")?;
        }
        match format_duration(self.duration) {
            d if d.is_empty() => f.write_str("0"),
            d => f.write_str(&d),
        }
    }
}

/// Parse `[<query> for ][!]<duration>`, e.g. `"tests #tonight for !30m"`.
pub fn parse_planning(input: &str) -> Result<PlanningRequest> {
    let input = input.trim();
    let caps = PLANNING_RE.captures(input).ok_or_else(|| {
        TonightError::InvalidPlanning(format!(
            "'{input}' does not match \"[<query> for ][!]<duration>\""
        ))
    })?;

    let q = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
    let strict = caps.get(2).is_some();
    let duration = parse_duration(&caps[3])?;

    Ok(PlanningRequest {
        q: q.to_string(),
        duration,
        strict,
    })
}
