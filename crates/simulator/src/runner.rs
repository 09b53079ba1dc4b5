//! Main simulator runner.
//!
//! Owns a topology across runs, so nodes can be removed between runs, and
//! fans independent runs out over a thread pool.

use crate::config::SimulatorConfig;
use crate::report::{BatchReport, SimulationReport};
use crate::SimulatorError;
use floodsim_simulation::run_with_config;
use floodsim_types::{NodeId, Role, Topology};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::info;

/// Runs flooding simulations over an owned topology.
pub struct Simulator {
    /// Topology every run floods over. Mutated only between runs.
    topology: Topology,

    /// Configuration.
    config: SimulatorConfig,
}

impl Simulator {
    /// Create a simulator, applying the configured node removals.
    ///
    /// Fails if the run parameters are invalid or a removed node is unknown.
    pub fn new(mut topology: Topology, config: SimulatorConfig) -> Result<Self, SimulatorError> {
        config.simulation.validate()?;
        for &node in &config.removed_nodes {
            topology.remove_node(node)?;
        }

        info!(
            nodes = topology.node_count(),
            links = topology.edge_count(),
            sinks = topology.sinks().len(),
            removed = config.removed_nodes.len(),
            runs = config.runs,
            "Simulator created"
        );

        Ok(Self { topology, config })
    }

    /// Current topology.
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Configuration.
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Remove a node and its links before the next run.
    pub fn remove_node(&mut self, node: NodeId) -> Result<Role, SimulatorError> {
        let role = self.topology.remove_node(node)?;
        info!(%node, ?role, remaining = self.topology.node_count(), "Node removed");
        Ok(role)
    }

    /// Perform one run with the configured seed.
    pub fn run(&self) -> Result<SimulationReport, SimulatorError> {
        self.run_seeded(self.config.simulation.seed)
    }

    /// Perform one run with an explicit seed.
    pub fn run_seeded(&self, seed: u64) -> Result<SimulationReport, SimulatorError> {
        let config = self.config.simulation.clone().with_seed(seed);
        let outcome = run_with_config(&self.topology, &config, ChaCha8Rng::seed_from_u64(seed))?;
        Ok(SimulationReport::from_outcome(
            seed,
            &outcome,
            self.config.top_bottlenecks,
        ))
    }

    /// Perform `config.runs` independent runs in parallel.
    ///
    /// Run `i` is seeded with [`SimulatorConfig::seed_for_run`]; reports come
    /// back in run order regardless of which thread finished first.
    pub fn run_batch(&self) -> Result<BatchReport, SimulatorError> {
        info!(
            runs = self.config.runs,
            threads = rayon::current_num_threads(),
            "Starting batch"
        );

        let reports = (0..self.config.runs)
            .into_par_iter()
            .map(|index| self.run_seeded(self.config.seed_for_run(index)))
            .collect::<Result<Vec<_>, _>>()?;

        let batch = BatchReport::new(reports);
        info!(
            runs = batch.runs.len(),
            mean_delivery_ratio = batch.mean_delivery_ratio,
            "Batch finished"
        );
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floodsim_simulation::SimulationConfig;
    use tracing_test::traced_test;

    fn config(horizon: f64) -> SimulatorConfig {
        SimulatorConfig::new(SimulationConfig::new(horizon))
    }

    #[traced_test]
    #[test]
    fn test_new_applies_removals() {
        let simulator =
            Simulator::new(Topology::path(5), config(10.0).with_removed_node(NodeId(2))).unwrap();

        assert_eq!(simulator.topology().node_count(), 4);
        assert!(!simulator.topology().contains(NodeId(2)));
        assert!(logs_contain("Simulator created"));
    }

    #[test]
    fn test_new_rejects_bad_input() {
        assert!(matches!(
            Simulator::new(Topology::path(3), config(-1.0)),
            Err(SimulatorError::Simulation(_))
        ));
        assert!(matches!(
            Simulator::new(Topology::path(3), config(10.0).with_removed_node(NodeId(7))),
            Err(SimulatorError::Topology(_))
        ));
    }

    #[test]
    fn test_run_reports_seed() {
        let simulator = Simulator::new(Topology::star(4), config(50.0)).unwrap();
        let report = simulator.run().unwrap();

        assert_eq!(report.seed, Some(floodsim_simulation::DEFAULT_SEED));
        assert!(report.stats.is_some());
        assert!(report.delivered <= report.generated);
    }

    #[traced_test]
    #[test]
    fn test_batch_logs_progress() {
        let simulator = Simulator::new(Topology::star(3), config(50.0).with_runs(3)).unwrap();
        let batch = simulator.run_batch().unwrap();

        assert_eq!(batch.runs.len(), 3);
        assert!(logs_contain("Starting batch"));
        assert!(logs_contain("Batch finished"));
    }

    #[test]
    fn test_remove_sink_stops_traffic() {
        let mut simulator = Simulator::new(Topology::star(4), config(200.0)).unwrap();
        assert!(simulator.run().unwrap().generated > 0);

        assert_eq!(simulator.remove_node(NodeId(0)).unwrap(), Role::Sink);
        let report = simulator.run().unwrap();
        assert_eq!(report.generated, 0);
        assert_eq!(report.delivery_ratio, 0.0);
    }
}
