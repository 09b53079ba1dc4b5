//! Simulator error types.

use floodsim_simulation::SimulationError;
use floodsim_types::TopologyError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or running a scenario.
#[derive(Debug, Error)]
pub enum SimulatorError {
    /// The scenario file could not be read.
    #[error("Failed to read scenario {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The scenario file is not valid TOML or has the wrong shape.
    #[error("Invalid scenario: {0}")]
    Parse(#[from] toml::de::Error),

    /// The run configuration was rejected by the engine.
    #[error("Simulation error: {0}")]
    Simulation(#[from] SimulationError),

    /// The topology could not be built or edited.
    #[error("Topology error: {0}")]
    Topology(#[from] TopologyError),
}
