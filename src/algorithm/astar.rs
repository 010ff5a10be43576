use super::{construct_path, seed_estimates, settle, Direction, Priority, SearchOutcome};
use crate::common::NodeId;
use crate::graph::Graph;
use crate::stat::Stats;

use std::time::Instant;
use tracing::{debug, instrument};

/// Fraction of the reverse-pass distance used as the heuristic estimate.
///
/// Below 1.0 the search leans on accumulated cost more than on the estimate;
/// callers wanting the plain reverse distance pass 1.0.
pub const DEFAULT_HEURISTIC_DISCOUNT: f64 = 0.9;

/// A* from `start` to `destination`.
///
/// A reverse uniform-cost pass from `destination` over incoming arcs seeds
/// every node's estimate with `discount` times its distance to the
/// destination; the forward pass then orders its open list by
/// `cost + estimate` and stops once the destination is popped.
#[instrument(skip_all, name = "a_star", fields(start = start, dest = destination, discount = discount), level = "debug")]
pub fn a_star_search(
    graph: &mut Graph,
    start: NodeId,
    destination: NodeId,
    discount: f64,
    stats: &mut Stats,
) -> SearchOutcome {
    if !graph.contains(start) || !graph.contains(destination) {
        debug!("start or destination missing from graph");
        return SearchOutcome::unreachable();
    }

    let search_start_time = Instant::now();
    stats.searches += 1;

    seed_estimates(graph, destination, discount, stats);
    settle(
        graph,
        start,
        Some(destination),
        Direction::Forward,
        Priority::CostPlusEstimate,
        stats,
    );

    let cost = graph
        .node(destination)
        .map(|node| node.cost())
        .unwrap_or_default();
    let path = if cost.is_reachable() {
        construct_path(graph, start, destination)
    } else {
        debug!("destination unreachable");
        None
    };

    stats.time_us += search_start_time.elapsed().as_micros() as usize;
    stats.cost = cost.finite().unwrap_or_default();
    SearchOutcome { cost, path }
}
