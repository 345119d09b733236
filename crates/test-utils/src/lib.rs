pub mod builders;

use std::sync::Once;

use anyhow::{Context, Result};
use tonight::service::{
    MemoryPlanningStore, MemoryTaskIndex, MemoryTaskStore, PlanningService, TaskService,
};
use tracing_subscriber::{EnvFilter, fmt};

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer() // print only for failing tests unless --nocapture
            .with_target(true)
            .init();
    });
}

pub type MemoryTasks = TaskService<MemoryTaskStore, MemoryTaskIndex>;
pub type MemoryPlannings = PlanningService<MemoryPlanningStore>;

/// In-memory task and planning services, with one task created per input
/// line (ids follow input order, starting at 1).
pub fn memory_services(inputs: &[&str]) -> Result<(MemoryTasks, MemoryPlannings)> {
    let mut tasks = TaskService::new(MemoryTaskStore::new(), MemoryTaskIndex::new());
    for input in inputs {
        tasks
            .create(input)
            .with_context(|| format!("creating task from {input:?}"))?;
    }
    tracing::debug!(tasks = inputs.len(), "seeded in-memory services");

    Ok((tasks, PlanningService::new(MemoryPlanningStore::new())))
}
