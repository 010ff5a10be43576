use anyhow::anyhow;
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::algorithm::DEFAULT_HEURISTIC_DISCOUNT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    Ucs,
    Astar,
    Ambush,
}

#[derive(Parser, Debug)]
#[command(
    name = "Ambush Paths",
    about = "Congestion-aware multi-agent pathfinding over weighted waypoint graphs.",
    version = "0.1"
)]
pub struct Cli {
    #[arg(long, help = "Path to a YAML config file")]
    pub config: Option<String>,

    #[arg(long, help = "Path to the YAML scenario file")]
    pub scenario_path: Option<String>,

    #[arg(long, help = "Path to the JSON output file")]
    pub output_path: Option<String>,

    #[arg(long, value_enum, help = "Search used to plan every agent")]
    pub algorithm: Option<SearchKind>,

    #[arg(long, help = "Number of planning rounds")]
    pub rounds: Option<usize>,

    #[arg(long, help = "Seed for generated arc weights")]
    pub seed: Option<u64>,

    #[arg(long, help = "Fraction of the reverse distance used as the A* estimate")]
    pub heuristic_discount: Option<f64>,

    #[arg(long, help = "Default log filter when RUST_LOG is unset")]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scenario_path: String,
    pub output_path: String,
    pub algorithm: SearchKind,
    pub rounds: usize,
    pub seed: u64,
    pub heuristic_discount: f64,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            scenario_path: "scenarios/ambush_grid.yaml".to_string(),
            output_path: "result/paths.json".to_string(),
            algorithm: SearchKind::Ambush,
            rounds: 1,
            seed: 0,
            heuristic_discount: DEFAULT_HEURISTIC_DISCOUNT,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Applies every option given explicitly on the command line.
    pub fn override_from_command_line(mut self, cli: &Cli) -> anyhow::Result<Self> {
        if let Some(scenario_path) = &cli.scenario_path {
            self.scenario_path = scenario_path.clone();
        }
        if let Some(output_path) = &cli.output_path {
            self.output_path = output_path.clone();
        }
        if let Some(algorithm) = cli.algorithm {
            self.algorithm = algorithm;
        }
        if let Some(rounds) = cli.rounds {
            self.rounds = rounds;
        }
        if let Some(seed) = cli.seed {
            self.seed = seed;
        }
        if let Some(heuristic_discount) = cli.heuristic_discount {
            self.heuristic_discount = heuristic_discount;
        }
        if let Some(log_level) = &cli.log_level {
            self.log_level = log_level.clone();
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.rounds == 0 {
            return Err(anyhow!("Number of planning rounds must be at least 1"));
        }

        if !(self.heuristic_discount > 0.0 && self.heuristic_discount <= 1.0) {
            return Err(anyhow!(
                "Heuristic discount must be in (0, 1], got {}",
                self.heuristic_discount
            ));
        }

        if self.scenario_path.is_empty() || self.output_path.is_empty() {
            return Err(anyhow!("Scenario and output paths must not be empty"));
        }
        Ok(())
    }
}
