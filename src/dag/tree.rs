// src/dag/tree.rs

use std::collections::{HashMap, VecDeque};

use crate::dag::graph::DependencyGraph;
use crate::errors::Result;
use crate::task::{Task, TaskId};

/// Everything that transitively needs a task, rooted at that task.
///
/// Children of a node are the tasks that directly need it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyTree {
    pub id: TaskId,
    pub children: Vec<DependencyTree>,
}

impl DependencyTree {
    pub fn leaf(id: TaskId) -> Self {
        Self {
            id,
            children: Vec::new(),
        }
    }

    /// Leaf ids, left to right.
    pub fn leaves(&self) -> Vec<TaskId> {
        if self.children.is_empty() {
            return vec![self.id];
        }
        self.children.iter().flat_map(|c| c.leaves()).collect()
    }

    /// Nodes in breadth-first order, root first.
    pub fn flat(&self) -> Vec<&DependencyTree> {
        let mut out = Vec::new();
        let mut queue = VecDeque::from([self]);
        while let Some(node) = queue.pop_front() {
            out.push(node);
            queue.extend(node.children.iter());
        }
        out
    }

    /// Visit nodes in reverse breadth-first order: deepest dependents first,
    /// root last.
    pub fn traverse_bottom_up<F>(&self, mut f: F)
    where
        F: FnMut(&DependencyTree),
    {
        for node in self.flat().into_iter().rev() {
            f(node);
        }
    }
}

/// Build one tree per task: the task and, transitively, every task that
/// needs it.
///
/// Cyclic input is rejected before anything is built.
pub fn build_dependency_trees(tasks: &[Task]) -> Result<HashMap<TaskId, DependencyTree>> {
    let graph = DependencyGraph::from_tasks(tasks);
    let order = graph.topological_order()?;

    // Dependents come after their prerequisites in `order`, so walking it
    // backwards finds every child tree already built.
    let mut trees: HashMap<TaskId, DependencyTree> = HashMap::with_capacity(order.len());
    for &id in order.iter().rev() {
        let children = graph
            .dependents_of(id)
            .iter()
            .filter_map(|child| trees.get(child).cloned())
            .collect();
        trees.insert(id, DependencyTree { id, children });
    }

    Ok(trees)
}
