use serde::{Deserialize, Serialize};

use super::NodeId;
use crate::graph::Graph;

/// Fixed waypoint coordinate, read only by the rendering layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }
}

/// A computed route, stored destination first as the searches produce it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Path {
    pub steps: Vec<NodeId>,
}

impl Path {
    pub fn new(steps: Vec<NodeId>) -> Self {
        Path { steps }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.steps.contains(&node)
    }

    pub fn destination(&self) -> Option<NodeId> {
        self.steps.first().copied()
    }

    pub fn start(&self) -> Option<NodeId> {
        self.steps.last().copied()
    }

    /// Nodes in the order an agent walks them, start to destination.
    pub fn walk_order(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.steps.iter().rev().copied()
    }

    /// Sum of nominal arc weights along the walk, or `None` when a step has
    /// no arc in `graph`.
    pub fn total_weight(&self, graph: &Graph) -> Option<u64> {
        let walk: Vec<NodeId> = self.walk_order().collect();
        walk.windows(2).try_fold(0u64, |total, pair| {
            graph
                .get_arc(pair[0], pair[1])
                .map(|arc| total + u64::from(arc.weight()))
        })
    }

    /// Every consecutive pair is joined by an arc of `graph`.
    pub fn verify(&self, graph: &Graph) -> bool {
        !self.is_empty()
            && self.steps.iter().all(|&node| graph.node(node).is_some())
            && self.total_weight(graph).is_some()
    }

    /// Nodes strictly between start and destination that both paths visit.
    pub fn shared_intermediates(&self, other: &Path) -> Vec<NodeId> {
        if self.len() < 3 {
            return Vec::new();
        }
        self.steps[1..self.len() - 1]
            .iter()
            .copied()
            .filter(|node| other.contains(*node))
            .collect()
    }
}

impl From<Vec<NodeId>> for Path {
    fn from(steps: Vec<NodeId>) -> Self {
        Path { steps }
    }
}
