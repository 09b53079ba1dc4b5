//! Configuration types for the simulator.

use crate::SimulatorError;
use floodsim_simulation::{ForwardingSchedule, SimulationConfig};
use floodsim_types::{NodeId, NodeSpec, Topology, TopologyFile};
use serde::Deserialize;
use std::path::Path;

/// Configuration for one simulator invocation (a single run or a batch).
#[derive(Clone, Debug, PartialEq)]
pub struct SimulatorConfig {
    /// Parameters of every run.
    pub simulation: SimulationConfig,

    /// Number of independent runs. Run `i` is seeded with `seed + i`.
    pub runs: usize,

    /// How many of the busiest forwarders to report.
    pub top_bottlenecks: usize,

    /// Nodes removed from the topology before the first run.
    pub removed_nodes: Vec<NodeId>,
}

impl SimulatorConfig {
    /// Create a simulator configuration around the given run parameters.
    pub fn new(simulation: SimulationConfig) -> Self {
        Self {
            simulation,
            runs: 1,
            top_bottlenecks: 5,
            removed_nodes: Vec::new(),
        }
    }

    /// Set the simulation parameters.
    pub fn with_simulation(mut self, simulation: SimulationConfig) -> Self {
        self.simulation = simulation;
        self
    }

    /// Set the number of runs. At least one run is always performed.
    pub fn with_runs(mut self, runs: usize) -> Self {
        self.runs = runs.max(1);
        self
    }

    /// Set how many bottleneck nodes reports list.
    pub fn with_top_bottlenecks(mut self, top: usize) -> Self {
        self.top_bottlenecks = top;
        self
    }

    /// Remove `node` from the topology before running.
    pub fn with_removed_node(mut self, node: NodeId) -> Self {
        if !self.removed_nodes.contains(&node) {
            self.removed_nodes.push(node);
        }
        self
    }

    /// Seed of the `index`-th run of a batch.
    pub fn seed_for_run(&self, index: usize) -> u64 {
        self.simulation.seed.wrapping_add(index as u64)
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

/// Optional `[run]` table of a scenario file.
///
/// Every field left out keeps the default.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunOverrides {
    pub horizon: Option<f64>,
    pub mean_interval: Option<f64>,
    pub hop_delay: Option<f64>,
    pub forwarding: Option<ForwardingSchedule>,
    pub seed: Option<u64>,
    pub runs: Option<usize>,
    pub top_bottlenecks: Option<usize>,
    pub remove: Vec<NodeId>,
}

impl RunOverrides {
    /// Apply the overrides on top of `config`.
    pub fn apply(&self, config: SimulatorConfig) -> SimulatorConfig {
        let mut simulation = config.simulation.clone();
        if let Some(horizon) = self.horizon {
            simulation = simulation.with_horizon(horizon);
        }
        if let Some(mean) = self.mean_interval {
            simulation = simulation.with_mean_interval(mean);
        }
        if let Some(delay) = self.hop_delay {
            simulation = simulation.with_hop_delay(delay);
        }
        if let Some(forwarding) = self.forwarding {
            simulation = simulation.with_forwarding(forwarding);
        }
        if let Some(seed) = self.seed {
            simulation = simulation.with_seed(seed);
        }

        let mut config = config.with_simulation(simulation);
        if let Some(runs) = self.runs {
            config = config.with_runs(runs);
        }
        if let Some(top) = self.top_bottlenecks {
            config = config.with_top_bottlenecks(top);
        }
        for &node in &self.remove {
            config = config.with_removed_node(node);
        }
        config
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScenarioFile {
    #[serde(default)]
    nodes: Vec<NodeSpec>,
    #[serde(default)]
    edges: Vec<(NodeId, NodeId)>,
    #[serde(default)]
    run: RunOverrides,
}

/// A topology plus the run parameters it ships with.
///
/// Scenario files are TOML:
///
/// ```toml
/// edges = [[0, 1], [1, 2]]
///
/// [[nodes]]
/// id = 0
/// role = "sensor"
///
/// [[nodes]]
/// id = 1
/// role = "sensor"
///
/// [[nodes]]
/// id = 2
/// role = "sink"
/// position = { x = 2.0, y = 0.0 }
///
/// [run]
/// horizon = 500
/// seed = 7
/// ```
#[derive(Clone, Debug)]
pub struct Scenario {
    pub topology: Topology,
    pub overrides: RunOverrides,
}

impl Scenario {
    /// Parse a scenario from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, SimulatorError> {
        let file: ScenarioFile = toml::from_str(text)?;
        let topology = Topology::try_from(TopologyFile {
            nodes: file.nodes,
            edges: file.edges,
        })?;

        Ok(Self {
            topology,
            overrides: file.run,
        })
    }

    /// Read and parse a scenario file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimulatorError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SimulatorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Simulator configuration: defaults with the scenario's `[run]` table applied.
    pub fn config(&self) -> SimulatorConfig {
        self.overrides.apply(SimulatorConfig::default())
    }
}
