use super::{construct_path, contention_degree, seed_estimates, OpenEntry};
use crate::common::{Agent, AgentId, Cost, NodeId, Path};
use crate::graph::Graph;
use crate::stat::Stats;

use std::collections::BinaryHeap;
use std::time::Instant;
use tracing::{debug, instrument, trace};

/// Congestion-aware A* for agent `current`.
///
/// Relaxing an arc into `n` costs `weight * degree(n)^2`, where `degree(n)`
/// is one plus the number of other agents in `agents` whose stored path
/// passes through `n`. Estimates are the undiscounted reverse distances to
/// `destination`.
///
/// The open list is drained completely: every relaxation that reaches the
/// destination at a cost no worse than its best so far rewrites the route,
/// and the last rewrite is returned (destination first). An empty path means
/// the destination is unreachable.
///
/// Each relaxation rescans every stored path, so a call costs
/// O(arcs * agents * path length); intended for small graphs and rosters.
/// Node search state is shared, so calls on one graph must run one after
/// another.
#[instrument(skip_all, name = "ambush", fields(agent = current, start = start, dest = destination), level = "debug")]
pub fn ambush_search(
    graph: &mut Graph,
    start: NodeId,
    destination: NodeId,
    agents: &[Agent],
    current: AgentId,
    stats: &mut Stats,
) -> Path {
    let mut path = Path::default();
    if !graph.contains(start) || !graph.contains(destination) {
        debug!("start or destination missing from graph");
        return path;
    }

    let search_start_time = Instant::now();
    stats.searches += 1;

    graph.reset_search_state();
    seed_estimates(graph, destination, 1.0, stats);

    let mut open = BinaryHeap::new();
    if let Some(node) = graph.node_mut(start) {
        node.set_cost(Cost::ZERO);
        node.set_visited(true);
        open.push(OpenEntry {
            key: node.estimate(),
            cost: Cost::ZERO,
            node: start,
        });
    }
    if start == destination {
        path = Path::new(vec![start]);
    }

    while let Some(entry) = open.pop() {
        let Some(current_cost) = graph.node(entry.node).map(|node| node.cost()) else {
            continue;
        };
        if entry.cost > current_cost {
            stats.stale_entries += 1;
            continue;
        }
        trace!("expand node: {entry:?}");
        stats.expanded_nodes += 1;

        for (neighbour, weight) in graph.successors(entry.node) {
            if neighbour == entry.node {
                continue;
            }
            stats.relaxed_arcs += 1;

            let degree = contention_degree(neighbour, agents, current);
            let penalty = u64::from(weight).saturating_mul(degree.saturating_mul(degree));
            let candidate = current_cost.plus(penalty);

            let Some(node) = graph.node_mut(neighbour) else {
                continue;
            };
            let best = node.cost();
            if candidate < best {
                node.set_cost(candidate);
                node.set_previous(Some(entry.node));
                node.set_visited(true);
                open.push(OpenEntry {
                    key: candidate.combine(node.estimate()),
                    cost: candidate,
                    node: neighbour,
                });
            } else if neighbour == destination && candidate.is_reachable() && candidate == best {
                // Equal-cost arrival: the latest route found wins.
                node.set_previous(Some(entry.node));
            }

            // An overflowed candidate is `Unreachable` and must never write a route.
            if neighbour == destination
                && neighbour != start
                && candidate.is_reachable()
                && candidate <= best
            {
                if let Some(route) = construct_path(graph, start, destination) {
                    trace!("destination reached at {candidate}: {:?}", route.steps);
                    path = route;
                    stats.path_writes += 1;
                }
            }
        }
    }

    let cost = graph
        .node(destination)
        .map(|node| node.cost())
        .unwrap_or_default();
    if path.is_empty() {
        debug!("destination unreachable for agent {current}");
    } else {
        debug!("agent {current} route cost {cost}: {:?}", path.steps);
    }

    stats.time_us += search_start_time.elapsed().as_micros() as usize;
    stats.cost = cost.finite().unwrap_or_default();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::tests::{build_graph, build_undirected, init_tracing};
    use crate::algorithm::{a_star_search, ucs_search};
    use crate::common::Roster;

    // Two disjoint equal routes from S to G:
    //   S - X - G
    //   S - Y - G
    fn diamond() -> Graph {
        build_undirected(
            &["S", "X", "Y", "G"],
            &[(0, 1, 1), (1, 3, 1), (0, 2, 1), (2, 3, 1)],
        )
    }

    #[test]
    fn test_ambush_agents_diverge() {
        init_tracing();
        let mut graph = diamond();
        let mut roster = Roster::new();
        let first = roster.add("first", 0, 3);
        let second = roster.add("second", 0, 3);
        let stats = &mut Stats::default();

        roster.plan_with_ambush(&mut graph, first, stats).unwrap();
        roster.plan_with_ambush(&mut graph, second, stats).unwrap();

        let first_path = &roster.get(first).unwrap().path;
        let second_path = &roster.get(second).unwrap().path;
        assert_eq!(first_path.len(), 3);
        assert_eq!(second_path.len(), 3);
        assert!(first_path.verify(&graph));
        assert!(second_path.verify(&graph));
        assert!(first_path.shared_intermediates(second_path).is_empty());
    }

    #[test]
    fn test_ambush_penalty_is_quadratic() {
        init_tracing();
        let mut graph = diamond();
        let mut agents = vec![
            Agent::new(0, "planner", 0, 3),
            Agent::new(1, "peer", 0, 3),
            Agent::new(2, "peer", 0, 3),
        ];
        agents[1].path = Path::new(vec![3, 1, 0]);
        agents[2].path = Path::new(vec![3, 1, 0]);
        let stats = &mut Stats::default();

        let path = ambush_search(&mut graph, 0, 3, &agents, 0, stats);
        assert_eq!(path.steps, vec![3, 2, 0]);
        // S->Y at degree 1, Y->G at degree 3.
        assert_eq!(graph.node(3).unwrap().cost(), Cost::Finite(1 + 9));
        assert_eq!(graph.node(1).unwrap().cost(), Cost::Finite(9));
    }

    #[test]
    fn test_ambush_own_path_is_not_contention() {
        let mut graph = diamond();
        let mut agents = vec![Agent::new(0, "solo", 0, 3)];
        agents[0].path = Path::new(vec![3, 1, 0]);
        let stats = &mut Stats::default();

        ambush_search(&mut graph, 0, 3, &agents, 0, stats);
        assert_eq!(graph.node(3).unwrap().cost(), Cost::Finite(2));
    }

    #[test]
    fn test_ambush_is_repeatable() {
        init_tracing();
        let mut graph = build_undirected(
            &["a", "b", "c", "d", "e", "f"],
            &[
                (0, 1, 2),
                (1, 2, 2),
                (0, 3, 1),
                (3, 4, 1),
                (4, 2, 2),
                (1, 4, 1),
                (2, 5, 1),
            ],
        );
        let mut roster = Roster::new();
        let id = roster.add("solo", 0, 5);
        let stats = &mut Stats::default();

        let first = roster.plan_with_ambush(&mut graph, id, stats).cloned().unwrap();
        let second = roster.plan_with_ambush(&mut graph, id, stats).cloned().unwrap();
        assert_eq!(first, second);
        assert!(first.verify(&graph));
    }

    #[test]
    fn test_ambush_without_peers_matches_shortest_distance() {
        let mut graph = build_graph(
            &["A", "B", "C", "D"],
            &[(0, 1, 1), (1, 2, 1), (0, 2, 5), (2, 3, 2), (0, 3, 9)],
        );
        let agents = vec![Agent::new(0, "solo", 0, 3)];
        let stats = &mut Stats::default();

        let path = ambush_search(&mut graph, 0, 3, &agents, 0, stats);
        let exact = ucs_search(&mut graph, 0, 3, stats).cost;
        assert_eq!(path.total_weight(&graph), exact.finite());
        assert_eq!(path.steps, vec![3, 2, 1, 0]);

        let guided = a_star_search(&mut graph, 0, 3, 1.0, stats);
        assert_eq!(guided.path, Some(path));
    }

    #[test]
    fn test_ambush_rewrites_path_on_improvement() {
        // The direct arc reaches D first; the cheaper detour replaces it.
        let mut graph = build_graph(&["A", "B", "C", "D"], &[(0, 3, 9), (0, 1, 1), (1, 2, 1), (2, 3, 1)]);
        let agents = vec![Agent::new(0, "solo", 0, 3)];
        let stats = &mut Stats::default();

        let path = ambush_search(&mut graph, 0, 3, &agents, 0, stats);
        assert_eq!(path.steps, vec![3, 2, 1, 0]);
        assert_eq!(stats.path_writes, 2);
    }

    #[test]
    fn test_ambush_unreachable_and_missing() {
        let mut graph = build_graph(&["A", "B", "C"], &[(0, 1, 1)]);
        let agents = vec![Agent::new(0, "solo", 0, 2)];
        let stats = &mut Stats::default();

        assert!(ambush_search(&mut graph, 0, 2, &agents, 0, stats).is_empty());
        assert_eq!(graph.node(2).unwrap().cost(), Cost::Unreachable);
        assert!(ambush_search(&mut graph, 0, 7, &agents, 0, stats).is_empty());
        assert_eq!(ambush_search(&mut graph, 1, 1, &agents, 0, stats).steps, vec![1]);
    }

    #[test]
    fn test_ambush_overflowed_cost_writes_no_route() {
        // 70_000 peers on G push `u32::MAX * degree^2` past u64::MAX.
        let mut graph = build_graph(&["S", "M", "G"], &[(0, 1, 1), (1, 2, u32::MAX)]);
        let mut agents = vec![Agent::new(0, "planner", 0, 2)];
        for id in 1..=70_000 {
            let mut peer = Agent::new(id, "peer", 2, 2);
            peer.path = Path::new(vec![2]);
            agents.push(peer);
        }
        let stats = &mut Stats::default();

        let path = ambush_search(&mut graph, 0, 2, &agents, 0, stats);
        assert_eq!(graph.node(2).unwrap().cost(), Cost::Unreachable);
        assert!(path.is_empty());
        assert_eq!(stats.path_writes, 0);
    }

    #[test]
    fn test_unreachable_goal_clears_stored_path() {
        let mut graph = build_graph(&["A", "B", "C"], &[(0, 1, 1)]);
        let mut roster = Roster::new();
        let id = roster.add("stuck", 0, 2);
        roster.set_path(id, Path::new(vec![2, 1, 0]));
        let stats = &mut Stats::default();

        let path = roster.plan_with_ambush(&mut graph, id, stats).unwrap();
        assert!(path.is_empty());
    }
}
