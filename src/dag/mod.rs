// src/dag/mod.rs

//! Task dependency graph and urgency scoring.
//!
//! - [`graph`] holds "needs" edges between tasks and rejects cycles.
//! - [`tree`] gives every task its own tree of transitive dependents.
//! - [`score`] computes unary urgency and propagates it to prerequisites.

pub mod graph;
pub mod score;
pub mod tree;

pub use graph::DependencyGraph;
pub use score::{score, score_at, score_many, unary_scorer};
pub use tree::{DependencyTree, build_dependency_trees};
