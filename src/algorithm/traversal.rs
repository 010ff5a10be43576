use std::collections::VecDeque;

use crate::common::NodeId;
use crate::graph::{Arc, Graph, Node};

/// Pre-order depth-first traversal from `start`, following arcs in insertion
/// order and handing each newly reached node to `visit`.
///
/// Marks are left set on return; call [`Graph::clear_marks`] before reusing
/// them. `start` itself is visited whatever its mark.
pub fn depth_first<F>(graph: &mut Graph, start: NodeId, mut visit: F)
where
    F: FnMut(&Node),
{
    let Some(node) = graph.node_mut(start) else {
        return;
    };
    visit(&*node);
    node.set_visited(true);

    // Each frame is a node and the index of the next arc to look at.
    let mut stack = vec![(start, 0usize)];
    while let Some(frame) = stack.last_mut() {
        let (id, cursor) = *frame;
        let next = graph
            .node(id)
            .and_then(|node| node.arcs().get(cursor))
            .map(Arc::target);

        let Some(target) = next else {
            stack.pop();
            continue;
        };
        frame.1 += 1;

        if let Some(node) = graph.node_mut(target) {
            if !node.visited() {
                visit(&*node);
                node.set_visited(true);
                stack.push((target, 0));
            }
        }
    }
}

/// Breadth-first traversal from `start`. Nodes are marked when enqueued and
/// handed to `visit` when dequeued.
pub fn breadth_first<F>(graph: &mut Graph, start: NodeId, mut visit: F)
where
    F: FnMut(&Node),
{
    let Some(node) = graph.node_mut(start) else {
        return;
    };
    node.set_visited(true);

    let mut queue = VecDeque::from([start]);
    while let Some(id) = queue.pop_front() {
        if let Some(node) = graph.node(id) {
            visit(&*node);
        }

        for (target, _) in graph.successors(id) {
            if let Some(node) = graph.node_mut(target) {
                if !node.visited() {
                    node.set_visited(true);
                    queue.push_back(target);
                }
            }
        }
    }
}
