// src/dag/graph.rs

use std::collections::HashMap;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use tracing::{debug, warn};

use crate::errors::{Result, TonightError};
use crate::task::{Task, TaskId};

/// Internal node structure: immediate prerequisites and dependents.
#[derive(Debug, Clone, Default)]
struct DagNode {
    /// Tasks this one needs.
    deps: Vec<TaskId>,
    /// Tasks that need this one.
    dependents: Vec<TaskId>,
}

/// In-memory dependency graph over a set of tasks.
///
/// Edges pointing at tasks outside the set are ignored, so the graph can be
/// built from any subset (typically a dependency closure).
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Task ids in input order, for deterministic iteration.
    order: Vec<TaskId>,
    nodes: HashMap<TaskId, DagNode>,
}

impl DependencyGraph {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let mut order = Vec::with_capacity(tasks.len());
        let mut nodes: HashMap<TaskId, DagNode> = HashMap::with_capacity(tasks.len());

        // First pass: one node per task.
        for task in tasks {
            if nodes.insert(task.id, DagNode::default()).is_some() {
                warn!(task = task.id, "duplicate task id in dependency graph input");
                continue;
            }
            order.push(task.id);
        }

        // Second pass: wire edges between known tasks.
        for task in tasks {
            for dep in &task.dependencies {
                if !nodes.contains_key(&dep.id) {
                    debug!(task = task.id, dep = dep.id, "dependency outside task set; ignoring");
                    continue;
                }

                if let Some(node) = nodes.get_mut(&task.id) {
                    if node.deps.contains(&dep.id) {
                        continue;
                    }
                    node.deps.push(dep.id);
                }
                if let Some(dep_node) = nodes.get_mut(&dep.id) {
                    dep_node.dependents.push(task.id);
                }
            }
        }

        Self { order, nodes }
    }

    /// All task ids, in input order.
    pub fn tasks(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.order.iter().copied()
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Tasks that `id` needs (restricted to the graph).
    pub fn dependencies_of(&self, id: TaskId) -> &[TaskId] {
        self.nodes
            .get(&id)
            .map(|n| n.deps.as_slice())
            .unwrap_or(&[])
    }

    /// Tasks that need `id`.
    pub fn dependents_of(&self, id: TaskId) -> &[TaskId] {
        self.nodes
            .get(&id)
            .map(|n| n.dependents.as_slice())
            .unwrap_or(&[])
    }

    /// Order in which every prerequisite comes before the tasks needing it.
    ///
    /// Fails with [`TonightError::DependencyCycle`] if some task transitively
    /// needs itself.
    pub fn topological_order(&self) -> Result<Vec<TaskId>> {
        // Edge direction: prerequisite -> dependent.
        let mut graph: DiGraphMap<TaskId, ()> = DiGraphMap::new();
        for id in self.tasks() {
            graph.add_node(id);
        }
        for id in self.tasks() {
            for &dependent in self.dependents_of(id) {
                graph.add_edge(id, dependent, ());
            }
        }

        toposort(&graph, None).map_err(|cycle| {
            TonightError::DependencyCycle(format!(
                "cycle detected in task dependencies involving task {}",
                cycle.node_id()
            ))
        })
    }

    pub fn ensure_acyclic(&self) -> Result<()> {
        self.topological_order().map(|_| ())
    }
}
