mod ambush;
mod astar;
mod traversal;
mod ucs;

pub use ambush::ambush_search;
pub use astar::{a_star_search, DEFAULT_HEURISTIC_DISCOUNT};
pub use traversal::{breadth_first, depth_first};
pub use ucs::ucs_search;

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::common::{Agent, AgentId, Cost, NodeId, Path};
use crate::graph::Graph;
use crate::stat::Stats;

use tracing::{info, trace, warn};

/// Result of a single-destination search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Cost of the destination, `Unreachable` when no route exists.
    pub cost: Cost,
    /// Route rebuilt from back-pointers, destination first.
    pub path: Option<Path>,
}

impl SearchOutcome {
    pub(crate) fn unreachable() -> Self {
        SearchOutcome {
            cost: Cost::Unreachable,
            path: None,
        }
    }
}

/// One row of the diagnostic output of [`display_path`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathReport {
    pub label: String,
    pub cost: Cost,
    pub estimate: Cost,
}

// Open list entry. `cost` is the node's cost when it was pushed, so an entry
// whose node has since improved is recognised as stale when popped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OpenEntry {
    pub(crate) key: Cost,
    pub(crate) cost: Cost,
    pub(crate) node: NodeId,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap; the node id only makes pops deterministic.
        other
            .key
            .cmp(&self.key)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    /// Follow outgoing arcs.
    Forward,
    /// Follow incoming arcs, measuring distance *to* the origin.
    Reverse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Priority {
    Cost,
    CostPlusEstimate,
}

impl Priority {
    fn key(self, cost: Cost, estimate: Cost) -> Cost {
        match self {
            Priority::Cost => cost,
            Priority::CostPlusEstimate => cost.combine(estimate),
        }
    }
}

/// Best-first edge relaxation from `origin`, written straight into node state.
///
/// Expects costs, marks and back-pointers already reset. Stops when
/// `stop_at` is popped or the open list runs dry. A node is pushed again
/// every time its cost improves; outdated entries are skipped on pop.
pub(crate) fn settle(
    graph: &mut Graph,
    origin: NodeId,
    stop_at: Option<NodeId>,
    direction: Direction,
    priority: Priority,
    stats: &mut Stats,
) {
    let Some(node) = graph.node_mut(origin) else {
        return;
    };
    node.set_cost(Cost::ZERO);
    node.set_visited(true);
    let origin_key = priority.key(Cost::ZERO, node.estimate());

    let incoming = match direction {
        Direction::Forward => None,
        Direction::Reverse => Some(graph.predecessors()),
    };

    let mut open = BinaryHeap::new();
    open.push(OpenEntry {
        key: origin_key,
        cost: Cost::ZERO,
        node: origin,
    });

    while let Some(entry) = open.pop() {
        let Some(current_cost) = graph.node(entry.node).map(|node| node.cost()) else {
            continue;
        };
        if entry.cost > current_cost {
            stats.stale_entries += 1;
            continue;
        }
        if stop_at == Some(entry.node) {
            break;
        }
        trace!("expand node: {entry:?}");
        stats.expanded_nodes += 1;

        let neighbours = match &incoming {
            Some(incoming) => incoming.get(&entry.node).cloned().unwrap_or_default(),
            None => graph.successors(entry.node),
        };

        for (neighbour, weight) in neighbours {
            if neighbour == entry.node {
                continue;
            }
            stats.relaxed_arcs += 1;
            let candidate = current_cost.plus(u64::from(weight));
            let Some(node) = graph.node_mut(neighbour) else {
                continue;
            };
            if candidate < node.cost() {
                node.set_cost(candidate);
                node.set_previous(Some(entry.node));
                node.set_visited(true);
                open.push(OpenEntry {
                    key: priority.key(candidate, node.estimate()),
                    cost: candidate,
                    node: neighbour,
                });
            }
        }
    }
}

/// Seeds every node's estimate with `discount` times its distance to
/// `destination`, then clears cost, marks and back-pointers for a forward
/// pass.
pub(crate) fn seed_estimates(
    graph: &mut Graph,
    destination: NodeId,
    discount: f64,
    stats: &mut Stats,
) {
    graph.reset_search_state();
    settle(
        graph,
        destination,
        None,
        Direction::Reverse,
        Priority::Cost,
        stats,
    );

    for node in graph.nodes_mut() {
        node.set_estimate(node.cost().discounted(discount));
        node.set_cost(Cost::Unreachable);
        node.set_visited(false);
        node.set_previous(None);
    }
}

/// Walks back-pointers from `destination` to `start`.
///
/// Returns `None` if the chain breaks or loops before reaching `start`.
pub(crate) fn construct_path(graph: &Graph, start: NodeId, destination: NodeId) -> Option<Path> {
    let mut steps = vec![destination];
    let mut current = destination;
    while current != start {
        if steps.len() > graph.len() {
            warn!("back-pointer chain from {destination} loops before reaching {start}");
            return None;
        }
        let Some(previous) = graph.node(current).and_then(|node| node.previous()) else {
            warn!("back-pointer chain from {destination} breaks at {current} before reaching {start}");
            return None;
        };
        current = previous;
        steps.push(current);
    }
    Some(Path::new(steps))
}

/// Contention degree of `node` for `current`: one plus the number of other
/// agents whose stored path passes through `node`.
///
/// Scans every stored path, so each call is O(agents * path length); an
/// ambush search pays that once per relaxed arc.
pub(crate) fn contention_degree(node: NodeId, agents: &[Agent], current: AgentId) -> u64 {
    let claimed = agents
        .iter()
        .filter(|agent| agent.id != current && agent.path.contains(node))
        .count();
    1 + claimed as u64
}

/// Reports label, cost and estimate of every node on the back-pointer chain
/// from `from` up to, but not including, `start`.
pub fn display_path(graph: &Graph, from: NodeId, start: NodeId) -> Vec<PathReport> {
    let mut reports = Vec::new();
    let mut current = Some(from);

    while let Some(id) = current {
        if id == start || reports.len() >= graph.len() {
            break;
        }
        let Some(node) = graph.node(id) else {
            break;
        };
        info!(
            "Node: {} Distance: {} Estimate: {}",
            node.label(),
            node.cost(),
            node.estimate()
        );
        reports.push(PathReport {
            label: node.label().to_string(),
            cost: node.cost(),
            estimate: node.estimate(),
        });
        current = node.previous();
    }

    reports
}
