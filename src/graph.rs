mod arc;
mod node;

pub use arc::Arc;
pub use node::{Node, NodeData, SearchMarks};

use std::collections::BTreeMap;

use crate::common::{NodeId, Position, Weight};

/// Directed weighted graph owning a bounded set of nodes keyed by slot index.
///
/// Slots are `0..capacity`; a slot holds at most one node, and arcs only
/// ever target occupied slots.
#[derive(Debug, Clone)]
pub struct Graph {
    capacity: usize,
    nodes: BTreeMap<NodeId, Node>,
}

impl Graph {
    pub fn new(capacity: usize) -> Self {
        Graph {
            capacity,
            nodes: BTreeMap::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, index: NodeId) -> Option<&Node> {
        self.nodes.get(&index)
    }

    pub fn node_mut(&mut self, index: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&index)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub(crate) fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.values_mut()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    pub fn contains(&self, index: NodeId) -> bool {
        self.nodes.contains_key(&index)
    }

    pub fn find_by_label(&self, label: &str) -> Option<NodeId> {
        self.nodes
            .values()
            .find(|node| node.label() == label)
            .map(Node::id)
    }

    /// Places a new unvisited node at `index`. Fails if the slot is taken or
    /// lies outside the capacity.
    pub fn add_node(&mut self, data: NodeData, index: NodeId, position: Position) -> bool {
        if index >= self.capacity || self.nodes.contains_key(&index) {
            return false;
        }
        self.nodes.insert(index, Node::new(index, data, position));
        true
    }

    /// Deletes the node at `index` together with every arc pointing at it.
    pub fn remove_node(&mut self, index: NodeId) -> bool {
        if !self.nodes.contains_key(&index) {
            return false;
        }
        for node in self.nodes.values_mut() {
            node.remove_arc(index);
        }
        self.nodes.remove(&index);
        true
    }

    /// Adds the directed arc `from -> to`. Fails when either endpoint is
    /// absent or the arc already exists.
    pub fn add_arc(&mut self, from: NodeId, to: NodeId, weight: Weight) -> bool {
        if !self.nodes.contains_key(&to) {
            return false;
        }
        match self.nodes.get_mut(&from) {
            Some(node) => node.add_arc(to, weight),
            None => false,
        }
    }

    pub fn remove_arc(&mut self, from: NodeId, to: NodeId) -> bool {
        match self.nodes.get_mut(&from) {
            Some(node) => node.remove_arc(to),
            None => false,
        }
    }

    pub fn get_arc(&self, from: NodeId, to: NodeId) -> Option<&Arc> {
        if !self.nodes.contains_key(&to) {
            return None;
        }
        self.nodes.get(&from)?.get_arc(to)
    }

    pub fn clear_marks(&mut self) {
        for node in self.nodes.values_mut() {
            node.set_visited(false);
        }
    }

    /// Resets cost, estimate, visited flag and back-pointer of every node.
    pub fn reset_search_state(&mut self) {
        for node in self.nodes.values_mut() {
            node.reset_search_state();
        }
    }

    /// Outgoing `(target, weight)` pairs of `index`, detached from the graph
    /// borrow so callers can mutate neighbours while iterating.
    pub(crate) fn successors(&self, index: NodeId) -> Vec<(NodeId, Weight)> {
        self.nodes
            .get(&index)
            .map(|node| {
                node.arcs()
                    .iter()
                    .map(|arc| (arc.target(), arc.weight()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Incoming `(source, weight)` pairs for every node, in source order.
    pub(crate) fn predecessors(&self) -> BTreeMap<NodeId, Vec<(NodeId, Weight)>> {
        let mut incoming: BTreeMap<NodeId, Vec<(NodeId, Weight)>> = BTreeMap::new();
        for node in self.nodes.values() {
            for arc in node.arcs() {
                incoming
                    .entry(arc.target())
                    .or_default()
                    .push((node.id(), arc.weight()));
            }
        }
        incoming
    }
}
