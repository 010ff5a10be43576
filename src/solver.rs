use serde::Serialize;
use tracing::{debug, info, warn};

use crate::algorithm::{a_star_search, ucs_search};
use crate::common::{AgentId, Position, Roster};
use crate::config::{Config, SearchKind};
use crate::graph::Graph;
use crate::stat::Stats;

/// Plans every agent of a roster once per call, strictly one after another.
pub trait Planner {
    fn plan_round(&mut self, graph: &mut Graph, roster: &mut Roster, stats: &mut Stats);
}

/// Independent shortest paths, no congestion awareness.
pub struct UcsPlanner;

/// Independent A* paths with a discounted reverse-distance estimate.
pub struct AStarPlanner {
    pub discount: f64,
}

/// Congestion-aware planning: each agent avoids nodes its peers hold.
pub struct AmbushPlanner;

impl Planner for UcsPlanner {
    fn plan_round(&mut self, graph: &mut Graph, roster: &mut Roster, stats: &mut Stats) {
        for id in roster.ids() {
            let Some(agent) = roster.get(id) else {
                continue;
            };
            let outcome = ucs_search(graph, agent.start, agent.goal, stats);
            roster.set_path(id, outcome.path.unwrap_or_default());
        }
    }
}

impl Planner for AStarPlanner {
    fn plan_round(&mut self, graph: &mut Graph, roster: &mut Roster, stats: &mut Stats) {
        for id in roster.ids() {
            let Some(agent) = roster.get(id) else {
                continue;
            };
            let outcome = a_star_search(graph, agent.start, agent.goal, self.discount, stats);
            roster.set_path(id, outcome.path.unwrap_or_default());
        }
    }
}

impl Planner for AmbushPlanner {
    fn plan_round(&mut self, graph: &mut Graph, roster: &mut Roster, stats: &mut Stats) {
        for id in roster.ids() {
            roster.plan_with_ambush(graph, id, stats);
        }
    }
}

pub fn planner_for(config: &Config) -> Box<dyn Planner> {
    match config.algorithm {
        SearchKind::Ucs => Box::new(UcsPlanner),
        SearchKind::Astar => Box::new(AStarPlanner {
            discount: config.heuristic_discount,
        }),
        SearchKind::Ambush => Box::new(AmbushPlanner),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Waypoint {
    pub label: String,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentRoute {
    pub agent: AgentId,
    pub name: String,
    /// Nominal weight of the route; `None` when no route was found.
    pub weight: Option<u64>,
    /// Waypoints in walking order, start first.
    pub waypoints: Vec<Waypoint>,
}

/// Snapshot of every agent's route after a planning round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Solution {
    pub round: usize,
    pub routes: Vec<AgentRoute>,
}

impl Solution {
    pub fn from_roster(round: usize, graph: &Graph, roster: &Roster) -> Self {
        let routes = roster
            .agents()
            .iter()
            .map(|agent| AgentRoute {
                agent: agent.id,
                name: agent.name.clone(),
                weight: if agent.path.is_empty() {
                    None
                } else {
                    agent.path.total_weight(graph)
                },
                waypoints: agent
                    .path
                    .walk_order()
                    .filter_map(|id| graph.node(id))
                    .map(|node| Waypoint {
                        label: node.label().to_string(),
                        position: node.position(),
                    })
                    .collect(),
            })
            .collect();
        Solution { round, routes }
    }

    /// Every agent holds a route that starts at its start, ends at its goal
    /// and only follows existing arcs.
    pub fn verify(graph: &Graph, roster: &Roster) -> bool {
        roster.agents().iter().all(|agent| {
            let path = &agent.path;
            let valid = path.verify(graph)
                && path.start() == Some(agent.start)
                && path.destination() == Some(agent.goal);
            if !valid {
                warn!("agent {} holds an invalid route {:?}", agent.id, path.steps);
            }
            valid
        })
    }

    /// Number of (agent pair, node) overlaps between intermediate nodes.
    pub fn overlap(roster: &Roster) -> usize {
        let agents = roster.agents();
        let mut overlap = 0;
        for i in 0..agents.len() {
            for j in (i + 1)..agents.len() {
                overlap += agents[i].path.shared_intermediates(&agents[j].path).len();
            }
        }
        debug!("route overlap: {overlap}");
        overlap
    }
}

/// Runs `rounds` planning rounds and returns the solution of each.
pub fn run_rounds(
    planner: &mut dyn Planner,
    graph: &mut Graph,
    roster: &mut Roster,
    rounds: usize,
    stats: &mut Stats,
) -> Vec<Solution> {
    (0..rounds)
        .map(|round| {
            planner.plan_round(graph, roster, stats);
            let solution = Solution::from_roster(round, graph, roster);
            info!(
                "round {round}: {} agents planned, overlap {}",
                solution.routes.len(),
                Solution::overlap(roster)
            );
            solution
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Position;
    use crate::graph::NodeData;

    // Three parallel corridors of equal length between S and G:
    //   S - a1 - a2 - G
    //   S - b1 - b2 - G
    //   S - c1 - c2 - G
    fn corridors() -> (Graph, Roster) {
        let labels = ["S", "a1", "a2", "b1", "b2", "c1", "c2", "G"];
        let mut graph = Graph::new(labels.len());
        for (index, label) in labels.iter().enumerate() {
            assert!(graph.add_node(NodeData::new(*label), index, Position::new(index as i32, 0)));
        }
        for (first, second) in [(1, 2), (3, 4), (5, 6)] {
            for (from, to) in [(0, first), (first, second), (second, 7)] {
                assert!(graph.add_arc(from, to, 1));
                assert!(graph.add_arc(to, from, 1));
            }
        }

        let mut roster = Roster::new();
        for name in ["red", "green", "blue"] {
            roster.add(name, 0, 7);
        }
        (graph, roster)
    }

    #[test]
    fn test_ambush_round_spreads_agents() {
        let (mut graph, mut roster) = corridors();
        let stats = &mut Stats::default();
        let solutions = run_rounds(&mut AmbushPlanner, &mut graph, &mut roster, 1, stats);

        assert!(Solution::verify(&graph, &roster));
        assert_eq!(Solution::overlap(&roster), 0);
        assert_eq!(solutions.len(), 1);
        assert!(solutions[0].routes.iter().all(|route| route.weight == Some(3)));
    }

    #[test]
    fn test_shortest_path_planners_converge() {
        let (mut graph, mut roster) = corridors();
        let stats = &mut Stats::default();
        run_rounds(&mut UcsPlanner, &mut graph, &mut roster, 1, stats);
        assert!(Solution::verify(&graph, &roster));
        assert_eq!(Solution::overlap(&roster), 6);

        let (mut graph, mut roster) = corridors();
        run_rounds(
            &mut AStarPlanner { discount: 0.9 },
            &mut graph,
            &mut roster,
            1,
            stats,
        );
        assert!(Solution::verify(&graph, &roster));
        assert_eq!(Solution::overlap(&roster), 6);
    }

    #[test]
    fn test_solution_lists_waypoints_in_walk_order() {
        let (mut graph, mut roster) = corridors();
        let stats = &mut Stats::default();
        let solutions = run_rounds(&mut AmbushPlanner, &mut graph, &mut roster, 2, stats);

        assert_eq!(solutions.len(), 2);
        let route = &solutions[1].routes[0];
        assert_eq!(route.waypoints.first().unwrap().label, "S");
        assert_eq!(route.waypoints.last().unwrap().label, "G");
        assert_eq!(route.waypoints.len(), 4);

        let json = serde_json::to_string(&solutions[1]).unwrap();
        assert!(json.contains("\"round\":1"));
    }
}
