//! Flooding simulator host.
//!
//! Builds on `floodsim-simulation` to provide:
//!
//! - **Scenarios**: TOML topology files with optional run parameters
//! - **Reports**: delivery ratio, latency percentiles, bottleneck ranking
//! - **Batches**: independent seeded runs executed in parallel
//! - **Node removal**: edit the topology between runs
//!
//! # Example
//!
//! ```
//! use floodsim_simulation::SimulationConfig;
//! use floodsim_simulator::{Simulator, SimulatorConfig};
//! use floodsim_types::Topology;
//!
//! let config = SimulatorConfig::new(SimulationConfig::new(200.0)).with_runs(4);
//! let simulator = Simulator::new(Topology::star(6), config).unwrap();
//!
//! let batch = simulator.run_batch().unwrap();
//! assert_eq!(batch.runs.len(), 4);
//! ```

mod config;
mod error;
mod report;
mod runner;

pub use config::{RunOverrides, Scenario, SimulatorConfig};
pub use error::SimulatorError;
pub use report::{top_bottlenecks, BatchReport, Bottleneck, SimulationReport};
pub use runner::Simulator;
