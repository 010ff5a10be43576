use ambush_paths::config::{Cli, Config};
use ambush_paths::scenario::Scenario;
use ambush_paths::solver::{planner_for, run_rounds, Solution};
use ambush_paths::stat::Stats;

use anyhow::Context;
use clap::Parser;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = if let Some(config_file) = cli.config.as_ref() {
        let config_str = fs::read_to_string(config_file)
            .with_context(|| format!("cannot read config file: {config_file}"))?;
        Config::from_yaml_str(&config_str)
            .with_context(|| format!("error with config file: {config_file}"))?
    } else {
        Config::default()
    }
    .override_from_command_line(&cli)?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    if cli.config.is_none() {
        info!("No config file specified, using default config");
    }

    let scenario = Scenario::load_from_file(&config.scenario_path)?;
    let (mut graph, mut roster) = scenario.build(config.seed)?;

    let mut planner = planner_for(&config);
    let mut stats = Stats::default();
    let solutions = run_rounds(
        planner.as_mut(),
        &mut graph,
        &mut roster,
        config.rounds,
        &mut stats,
    );
    stats.print();

    if !Solution::verify(&graph, &roster) {
        error!("some agents have no valid route");
    }

    if let Some(parent) = Path::new(&config.output_path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
    }
    let file = File::create(&config.output_path)
        .with_context(|| format!("cannot create output file: {}", config.output_path))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &solutions)?;
    info!("Routes written to {}", config.output_path);

    Ok(())
}
