//! Flooding simulator CLI
//!
//! Run flooding simulations over a topology described in a scenario file.
//!
//! # Example
//!
//! ```bash
//! # Single run with the scenario's own parameters
//! floodsim --scenario scenarios/ring.toml
//!
//! # Longer run with a different seed, as JSON
//! floodsim -s scenarios/ring.toml --horizon 5000 --seed 42 --json
//!
//! # Ten seeded runs in parallel after removing node 3
//! floodsim -s scenarios/ring.toml --runs 10 --remove 3
//! ```

use clap::Parser;
use floodsim_simulation::ForwardingSchedule;
use floodsim_simulator::{Scenario, Simulator};
use floodsim_types::NodeId;
use std::error::Error;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Flooding simulator
///
/// Every sensor emits packets toward a randomly chosen sink and every node
/// relays each packet to all its neighbors once.
#[derive(Parser, Debug)]
#[command(name = "floodsim")]
#[command(version, about, long_about = None)]
struct Args {
    /// Scenario file (TOML)
    #[arg(short = 's', long)]
    scenario: PathBuf,

    /// Simulated-time horizon
    #[arg(short = 't', long)]
    horizon: Option<f64>,

    /// Random seed; batch run i uses seed + i
    #[arg(long)]
    seed: Option<u64>,

    /// Number of independent runs
    #[arg(short = 'n', long)]
    runs: Option<usize>,

    /// Remove a node before running (repeatable)
    #[arg(long = "remove", value_name = "NODE")]
    remove: Vec<u32>,

    /// Transmit to neighbors one after another instead of all at once
    #[arg(long)]
    sequential: bool,

    /// Number of bottleneck nodes to report
    #[arg(long)]
    top: Option<usize>,

    /// Print reports as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("warn,floodsim_simulator=info,floodsim_simulation=info")
        }))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let scenario = Scenario::load(&args.scenario)?;

    let mut config = scenario.config();
    let mut simulation = config.simulation.clone();
    if let Some(horizon) = args.horizon {
        simulation = simulation.with_horizon(horizon);
    }
    if let Some(seed) = args.seed {
        simulation = simulation.with_seed(seed);
    }
    if args.sequential {
        simulation = simulation.with_forwarding(ForwardingSchedule::Sequential);
    }
    config = config.with_simulation(simulation);
    if let Some(runs) = args.runs {
        config = config.with_runs(runs);
    }
    if let Some(top) = args.top {
        config = config.with_top_bottlenecks(top);
    }
    for node in args.remove {
        config = config.with_removed_node(NodeId(node));
    }

    info!(
        scenario = %args.scenario.display(),
        horizon = config.simulation.horizon,
        seed = config.simulation.seed,
        runs = config.runs,
        "Loaded scenario"
    );

    let simulator = Simulator::new(scenario.topology, config)?;

    if simulator.config().runs == 1 {
        let report = simulator.run()?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            report.print_summary();
        }
    } else {
        let batch = simulator.run_batch()?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&batch)?);
        } else {
            batch.print_summary();
        }
    }

    Ok(())
}
