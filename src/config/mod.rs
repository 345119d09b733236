// src/config/mod.rs

//! Configuration loading and validation.
//!
//! - `model.rs`: the TOML-backed data model and its validated counterpart.
//! - `loader.rs`: reading a config file from disk.
//! - `validate.rs`: checking durations and weights.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{
    ConfigFile, PlannerConfig, PlannerSection, RawConfigFile, ScoreConfig, ScoreSection,
};
