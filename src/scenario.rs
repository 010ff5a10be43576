use anyhow::{bail, Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use tracing::{debug, info};

use crate::common::{NodeId, Position, Roster, Weight};
use crate::graph::{Graph, NodeData};

/// Generator for a rectangular waypoint grid with 4- or 8-neighbour arcs.
#[derive(Debug, Clone, Deserialize)]
pub struct GridSpec {
    pub columns: usize,
    pub rows: usize,
    #[serde(default = "default_spacing")]
    pub spacing: i32,
    #[serde(default)]
    pub origin: Position,
    #[serde(default = "default_weight")]
    pub min_weight: Weight,
    #[serde(default = "default_weight")]
    pub max_weight: Weight,
    #[serde(default)]
    pub diagonal: bool,
}

fn default_spacing() -> i32 {
    50
}

fn default_weight() -> Weight {
    1
}

fn default_bidirectional() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeSpec {
    pub index: Option<NodeId>,
    pub label: String,
    #[serde(default)]
    pub position: Position,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArcSpec {
    pub from: String,
    pub to: String,
    pub weight: Weight,
    #[serde(default = "default_bidirectional")]
    pub bidirectional: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentSpec {
    pub name: String,
    pub start: String,
    pub goal: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub capacity: Option<usize>,
    pub grid: Option<GridSpec>,
    #[serde(default)]
    pub nodes: Vec<NodeSpec>,
    #[serde(default)]
    pub arcs: Vec<ArcSpec>,
    #[serde(default)]
    pub agents: Vec<AgentSpec>,
}

impl Scenario {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("cannot open scenario {path}"))?;
        let reader = BufReader::new(file);
        let scenario = serde_yaml::from_reader(reader)
            .with_context(|| format!("cannot parse scenario {path}"))?;
        Ok(scenario)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    fn grid_size(&self) -> usize {
        self.grid
            .as_ref()
            .map_or(0, |grid| grid.columns.saturating_mul(grid.rows))
    }

    /// Slots needed to hold every node the scenario declares.
    pub fn required_capacity(&self) -> usize {
        let sequential = self.grid_size() + self.nodes.len();
        let highest = self
            .nodes
            .iter()
            .filter_map(|node| node.index)
            .map(|index| index.saturating_add(1))
            .max()
            .unwrap_or(0);
        sequential.max(highest)
    }

    /// Builds the graph and the agent roster. Grid arc weights are drawn from
    /// a generator seeded with `seed`.
    pub fn build(&self, seed: u64) -> Result<(Graph, Roster)> {
        let capacity = self.capacity.unwrap_or_else(|| self.required_capacity());
        let mut graph = Graph::new(capacity);
        let mut rng = StdRng::seed_from_u64(seed);

        if let Some(grid) = &self.grid {
            build_grid(&mut graph, grid, &mut rng)?;
        }

        let mut next_index = self.grid_size();
        for node in &self.nodes {
            if graph.find_by_label(&node.label).is_some() {
                bail!("duplicate node label {}", node.label);
            }
            let index = node.index.unwrap_or(next_index);
            if index >= capacity {
                bail!(
                    "node {} index {index} is beyond capacity {capacity}",
                    node.label
                );
            }
            if !graph.add_node(NodeData::new(node.label.as_str()), index, node.position) {
                bail!(
                    "cannot place node {} at index {index}: slot occupied",
                    node.label
                );
            }
            next_index = next_index.max(index + 1);
        }

        for arc in &self.arcs {
            let from = lookup(&graph, &arc.from)?;
            let to = lookup(&graph, &arc.to)?;
            if !graph.add_arc(from, to, arc.weight) {
                bail!("duplicate arc {} -> {}", arc.from, arc.to);
            }
            if arc.bidirectional && !graph.add_arc(to, from, arc.weight) {
                bail!("duplicate arc {} -> {}", arc.to, arc.from);
            }
        }

        let mut roster = Roster::new();
        for agent in &self.agents {
            let start = lookup(&graph, &agent.start)?;
            let goal = lookup(&graph, &agent.goal)?;
            roster.add(agent.name.as_str(), start, goal);
        }

        info!(
            "Scenario built: {} nodes, capacity {capacity}, {} agents",
            graph.len(),
            roster.len()
        );
        Ok((graph, roster))
    }
}

fn lookup(graph: &Graph, label: &str) -> Result<NodeId> {
    graph
        .find_by_label(label)
        .with_context(|| format!("unknown node label {label}"))
}

pub fn grid_label(row: usize, column: usize) -> String {
    format!("r{row}c{column}")
}

fn build_grid<R: Rng + ?Sized>(graph: &mut Graph, grid: &GridSpec, rng: &mut R) -> Result<()> {
    if grid.min_weight == 0 || grid.min_weight > grid.max_weight {
        bail!(
            "grid weights must satisfy 1 <= min_weight <= max_weight, got {}..={}",
            grid.min_weight,
            grid.max_weight
        );
    }

    let index_of = |row: usize, column: usize| row * grid.columns + column;

    for row in 0..grid.rows {
        for column in 0..grid.columns {
            let position = Position::new(
                grid.origin.x + column as i32 * grid.spacing,
                grid.origin.y + row as i32 * grid.spacing,
            );
            if !graph.add_node(
                NodeData::new(grid_label(row, column)),
                index_of(row, column),
                position,
            ) {
                bail!("grid does not fit capacity {}", graph.capacity());
            }
        }
    }

    let mut offsets = vec![(0, 1), (1, 0)];
    if grid.diagonal {
        offsets.extend([(1, 1), (1, -1)]);
    }

    for row in 0..grid.rows {
        for column in 0..grid.columns {
            for &(row_step, column_step) in &offsets {
                let next_row = row + row_step;
                let next_column = column as isize + column_step;
                if next_row >= grid.rows || next_column < 0 || next_column as usize >= grid.columns
                {
                    continue;
                }
                let from = index_of(row, column);
                let to = index_of(next_row, next_column as usize);
                let weight = rng.gen_range(grid.min_weight..=grid.max_weight);
                graph.add_arc(from, to, weight);
                graph.add_arc(to, from, weight);
            }
        }
    }

    debug!("grid {}x{} generated", grid.columns, grid.rows);
    Ok(())
}
