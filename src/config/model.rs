// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

/// Top-level configuration as read from a TOML file, before validation.
///
/// ```toml
/// [planner]
/// default_task_duration = "1h"
///
/// [score]
/// duration_cap = 5.0
/// deadline_weight = 6.0
/// ```
///
/// All sections are optional and have the defaults shown above.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub planner: PlannerSection,

    #[serde(default)]
    pub score: ScoreSection,
}

/// `[planner]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct PlannerSection {
    /// Duration assumed for tasks without a (parseable) duration when
    /// computing what is left to do.
    #[serde(default = "default_task_duration")]
    pub default_task_duration: String,
}

fn default_task_duration() -> String {
    "1h".to_string()
}

impl Default for PlannerSection {
    fn default() -> Self {
        Self {
            default_task_duration: default_task_duration(),
        }
    }
}

/// `[score]` section: knobs of the unary urgency function.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoreSection {
    /// Upper bound of the `ln(1 + hours)` duration term.
    #[serde(default = "default_duration_cap")]
    pub duration_cap: f64,

    /// Height of the deadline sigmoid.
    #[serde(default = "default_deadline_weight")]
    pub deadline_weight: f64,
}

fn default_duration_cap() -> f64 {
    5.0
}

fn default_deadline_weight() -> f64 {
    6.0
}

impl Default for ScoreSection {
    fn default() -> Self {
        Self {
            duration_cap: default_duration_cap(),
            deadline_weight: default_deadline_weight(),
        }
    }
}

/// Validated planner settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannerConfig {
    pub default_task_duration: Duration,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            default_task_duration: Duration::from_secs(60 * 60),
        }
    }
}

/// Validated scoring settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreConfig {
    pub duration_cap: f64,
    pub deadline_weight: f64,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            duration_cap: default_duration_cap(),
            deadline_weight: default_deadline_weight(),
        }
    }
}

/// Validated configuration.
///
/// Only obtainable through `TryFrom<RawConfigFile>` (or `Default`), so holders
/// can rely on every value being usable.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ConfigFile {
    pub planner: PlannerConfig,
    pub score: ScoreConfig,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(planner: PlannerConfig, score: ScoreConfig) -> Self {
        Self { planner, score }
    }
}
