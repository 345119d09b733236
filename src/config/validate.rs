// src/config/validate.rs

use crate::config::model::{ConfigFile, PlannerConfig, RawConfigFile, ScoreConfig};
use crate::errors::{Result, TonightError};
use crate::task::parse_duration;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = TonightError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let planner = validate_planner(&raw)?;
        let score = validate_score(&raw)?;
        Ok(ConfigFile::new_unchecked(planner, score))
    }
}

fn validate_planner(cfg: &RawConfigFile) -> Result<PlannerConfig> {
    let raw = &cfg.planner.default_task_duration;
    let default_task_duration = parse_duration(raw).map_err(|e| {
        TonightError::ConfigError(format!(
            "[planner].default_task_duration is not a valid duration ('{raw}'): {e}"
        ))
    })?;

    if default_task_duration.is_zero() {
        return Err(TonightError::ConfigError(
            "[planner].default_task_duration must be > 0".to_string(),
        ));
    }

    Ok(PlannerConfig {
        default_task_duration,
    })
}

fn validate_score(cfg: &RawConfigFile) -> Result<ScoreConfig> {
    let section = &cfg.score;
    for (name, value) in [
        ("duration_cap", section.duration_cap),
        ("deadline_weight", section.deadline_weight),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(TonightError::ConfigError(format!(
                "[score].{name} must be a finite number >= 0 (got {value})"
            )));
        }
    }

    Ok(ScoreConfig {
        duration_cap: section.duration_cap,
        deadline_weight: section.deadline_weight,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn defaults_are_valid() {
        let cfg = ConfigFile::try_from(RawConfigFile::default()).unwrap();
        assert_eq!(cfg, ConfigFile::default());
        assert_eq!(
            cfg.planner.default_task_duration,
            Duration::from_secs(3600)
        );
    }

    #[test]
    fn rejects_zero_default_duration() {
        let mut raw = RawConfigFile::default();
        raw.planner.default_task_duration = "0".to_string();
        assert!(matches!(
            ConfigFile::try_from(raw),
            Err(TonightError::ConfigError(_))
        ));
    }

    #[test]
    fn rejects_negative_weights() {
        let mut raw = RawConfigFile::default();
        raw.score.deadline_weight = -1.0;
        match ConfigFile::try_from(raw) {
            Err(TonightError::ConfigError(msg)) => assert!(msg.contains("deadline_weight")),
            other => panic!("expected ConfigError, got {other:?}"),
        }
    }
}
