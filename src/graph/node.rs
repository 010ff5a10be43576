use super::Arc;
use crate::common::{Cost, NodeId, Position, Weight};

/// Label and current cost, always read and written together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    pub label: String,
    pub cost: Cost,
}

impl NodeData {
    pub fn new(label: impl Into<String>) -> Self {
        NodeData {
            label: label.into(),
            cost: Cost::Unreachable,
        }
    }

    pub fn with_cost(label: impl Into<String>, cost: Cost) -> Self {
        NodeData {
            label: label.into(),
            cost,
        }
    }
}

/// Per-node state rewritten by every search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMarks {
    pub visited: bool,
    pub estimate: Cost,
    /// Handle of the node this one was reached from; never an ownership link.
    pub previous: Option<NodeId>,
}

impl Default for SearchMarks {
    fn default() -> Self {
        SearchMarks {
            visited: false,
            estimate: Cost::Unreachable,
            previous: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    data: NodeData,
    position: Position,
    marks: SearchMarks,
    arcs: Vec<Arc>,
}

impl Node {
    pub(crate) fn new(id: NodeId, data: NodeData, position: Position) -> Self {
        Node {
            id,
            data,
            position,
            marks: SearchMarks::default(),
            arcs: Vec::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.data.label
    }

    pub fn cost(&self) -> Cost {
        self.data.cost
    }

    pub fn set_cost(&mut self, cost: Cost) {
        self.data.cost = cost;
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn visited(&self) -> bool {
        self.marks.visited
    }

    pub fn set_visited(&mut self, visited: bool) {
        self.marks.visited = visited;
    }

    pub fn estimate(&self) -> Cost {
        self.marks.estimate
    }

    pub fn set_estimate(&mut self, estimate: Cost) {
        self.marks.estimate = estimate;
    }

    pub fn previous(&self) -> Option<NodeId> {
        self.marks.previous
    }

    pub fn set_previous(&mut self, previous: Option<NodeId>) {
        self.marks.previous = previous;
    }

    /// Outgoing arcs in insertion order.
    pub fn arcs(&self) -> &[Arc] {
        &self.arcs
    }

    pub fn get_arc(&self, target: NodeId) -> Option<&Arc> {
        self.arcs.iter().find(|arc| arc.target() == target)
    }

    pub(crate) fn add_arc(&mut self, target: NodeId, weight: Weight) -> bool {
        if self.get_arc(target).is_some() {
            return false;
        }
        self.arcs.push(Arc::new(target, weight));
        true
    }

    pub(crate) fn remove_arc(&mut self, target: NodeId) -> bool {
        let before = self.arcs.len();
        self.arcs.retain(|arc| arc.target() != target);
        self.arcs.len() != before
    }

    /// Cost and every search mark back to their unexplored values.
    pub(crate) fn reset_search_state(&mut self) {
        self.data.cost = Cost::Unreachable;
        self.marks = SearchMarks::default();
    }
}
