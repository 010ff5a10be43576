use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{NodeId, Path};
use crate::algorithm::ambush_search;
use crate::graph::Graph;
use crate::stat::Stats;

pub type AgentId = usize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    pub start: NodeId,
    pub goal: NodeId,
    /// Most recent plan, destination first. Other agents read it when scoring
    /// contention, so it is replaced wholesale and never appended to.
    pub path: Path,
}

impl Agent {
    pub fn new(id: AgentId, name: impl Into<String>, start: NodeId, goal: NodeId) -> Self {
        Agent {
            id,
            name: name.into(),
            start,
            goal,
            path: Path::default(),
        }
    }
}

/// Every agent taking part in a planning round, indexed by `AgentId`.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    agents: Vec<Agent>,
}

impl Roster {
    pub fn new() -> Self {
        Roster::default()
    }

    pub fn add(&mut self, name: impl Into<String>, start: NodeId, goal: NodeId) -> AgentId {
        let id = self.agents.len();
        self.agents.push(Agent::new(id, name, start, goal));
        id
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id)
    }

    pub fn ids(&self) -> std::ops::Range<AgentId> {
        0..self.agents.len()
    }

    /// Overwrites the stored path of `id`. Returns false for an unknown agent.
    pub fn set_path(&mut self, id: AgentId, path: Path) -> bool {
        match self.agents.get_mut(id) {
            Some(agent) => {
                agent.path = path;
                true
            }
            None => false,
        }
    }

    /// Runs one congestion-aware search for `id` against the paths the other
    /// agents currently hold, then stores the result as that agent's path.
    ///
    /// An unreachable goal leaves the agent with an empty path.
    pub fn plan_with_ambush(
        &mut self,
        graph: &mut Graph,
        id: AgentId,
        stats: &mut Stats,
    ) -> Option<&Path> {
        let (start, goal) = {
            let agent = self.agents.get(id)?;
            (agent.start, agent.goal)
        };

        let path = ambush_search(graph, start, goal, &self.agents, id, stats);
        debug!("agent {id} planned {} steps", path.len());

        let agent = &mut self.agents[id];
        agent.path = path;
        Some(&agent.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_assigns_sequential_ids() {
        let mut roster = Roster::new();
        assert_eq!(roster.add("first", 0, 3), 0);
        assert_eq!(roster.add("second", 1, 3), 1);
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.get(1).unwrap().name, "second");
        assert!(roster.get(1).unwrap().path.is_empty());
    }

    #[test]
    fn test_set_path_overwrites() {
        let mut roster = Roster::new();
        let id = roster.add("only", 0, 2);
        assert!(roster.set_path(id, Path::new(vec![2, 1, 0])));
        assert!(roster.set_path(id, Path::new(vec![2, 0])));
        assert_eq!(roster.get(id).unwrap().path.steps, vec![2, 0]);
        assert!(!roster.set_path(7, Path::default()));
    }
}
