use super::{construct_path, settle, Direction, Priority, SearchOutcome};
use crate::common::NodeId;
use crate::graph::Graph;
use crate::stat::Stats;

use std::time::Instant;
use tracing::{debug, instrument};

/// Uniform-cost search from `start`, stopping once `destination` is popped.
///
/// Every node reached gets its shortest known cost and back-pointer written
/// in place; nodes never reached keep `Cost::Unreachable`.
#[instrument(skip_all, name = "ucs", fields(start = start, dest = destination), level = "debug")]
pub fn ucs_search(
    graph: &mut Graph,
    start: NodeId,
    destination: NodeId,
    stats: &mut Stats,
) -> SearchOutcome {
    if !graph.contains(start) || !graph.contains(destination) {
        debug!("start or destination missing from graph");
        return SearchOutcome::unreachable();
    }

    let search_start_time = Instant::now();
    stats.searches += 1;

    graph.reset_search_state();
    settle(
        graph,
        start,
        Some(destination),
        Direction::Forward,
        Priority::Cost,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::tests::{brute_force_distance, build_graph, init_tracing};
    use crate::common::Cost;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_ucs_prefers_cheaper_detour() {
        init_tracing();
        let mut graph = build_graph(&["A", "B", "C"], &[(0, 1, 1), (1, 2, 1), (0, 2, 5)]);
        let stats = &mut Stats::default();
        let outcome = ucs_search(&mut graph, 0, 2, stats);

        assert_eq!(outcome.cost, Cost::Finite(2));
        assert_eq!(outcome.path.unwrap().steps, vec![2, 1, 0]);
        assert_eq!(graph.node(2).unwrap().previous(), Some(1));
        assert_eq!(stats.searches, 1);
    }

    #[test]
    fn test_ucs_unreachable_destination() {
        init_tracing();
        let mut graph = build_graph(&["A", "B", "C", "D"], &[(0, 1, 1), (1, 0, 1), (2, 3, 1)]);
        let stats = &mut Stats::default();
        let outcome = ucs_search(&mut graph, 0, 3, stats);

        assert_eq!(outcome, SearchOutcome::unreachable());
        assert_eq!(graph.node(3).unwrap().cost(), Cost::Unreachable);
        assert!(graph.node(3).unwrap().previous().is_none());
        // The whole reachable component was exhausted.
        assert!(graph.node(1).unwrap().visited());
        assert!(!graph.node(2).unwrap().visited());
    }

    #[test]
    fn test_ucs_missing_endpoints() {
        let mut graph = build_graph(&["A", "B"], &[(0, 1, 1)]);
        let stats = &mut Stats::default();
        assert_eq!(ucs_search(&mut graph, 0, 5, stats).cost, Cost::Unreachable);
        assert_eq!(ucs_search(&mut graph, 5, 0, stats).cost, Cost::Unreachable);
        assert_eq!(stats.searches, 0);
    }

    #[test]
    fn test_ucs_start_is_destination() {
        let mut graph = build_graph(&["A", "B"], &[(0, 1, 1)]);
        let stats = &mut Stats::default();
        let outcome = ucs_search(&mut graph, 1, 1, stats);
        assert_eq!(outcome.cost, Cost::ZERO);
        assert_eq!(outcome.path.unwrap().steps, vec![1]);
    }

    #[test]
    fn test_ucs_ignores_stale_marks() {
        let mut graph = build_graph(&["A", "B", "C"], &[(0, 1, 1), (1, 2, 1)]);
        for id in 0..3 {
            graph.node_mut(id).unwrap().set_visited(true);
        }
        let stats = &mut Stats::default();
        assert_eq!(ucs_search(&mut graph, 0, 2, stats).cost, Cost::Finite(2));
    }

    #[test]
    fn test_ucs_matches_brute_force_on_random_graphs() {
        init_tracing();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..40 {
            let size = rng.gen_range(2..=7);
            let labels: Vec<String> = (0..size).map(|i| format!("n{i}")).collect();
            let label_refs: Vec<&str> = labels.iter().map(String::as_str).collect();
            let mut arcs = Vec::new();
            for from in 0..size {
                for to in 0..size {
                    if from != to && rng.gen_bool(0.4) {
                        arcs.push((from, to, rng.gen_range(1..=9)));
                    }
                }
            }
            let mut graph = build_graph(&label_refs, &arcs);
            let stats = &mut Stats::default();

            for destination in 0..size {
                let outcome = ucs_search(&mut graph, 0, destination, stats);
                let expected = brute_force_distance(&graph, 0, destination);
                assert_eq!(outcome.cost.finite(), expected, "arcs {arcs:?} -> {destination}");
                if let Some(path) = outcome.path {
                    assert_eq!(path.total_weight(&graph), expected);
                }
            }
        }
    }
}
