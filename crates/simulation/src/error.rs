//! Error types for simulation setup.

use floodsim_types::NodeId;
use thiserror::Error;

/// Errors raised before any event is scheduled.
///
/// A run that gets past setup never fails: degenerate inputs (no sink, zero
/// horizon) produce empty metrics instead of an error.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Horizon is negative, NaN or too large to represent.
    #[error("Invalid horizon: {0}")]
    InvalidHorizon(f64),

    /// A packet injection time is negative, NaN or too large to represent.
    #[error("Invalid injection time: {0}")]
    InvalidTime(f64),

    /// Mean inter-arrival time must be finite and no smaller than one nanosecond.
    #[error("Invalid mean inter-arrival time: {0}")]
    InvalidMeanInterval(f64),

    /// Per-hop delay must be finite and positive.
    #[error("Invalid hop delay: {0}")]
    InvalidHopDelay(f64),

    /// A packet was injected at or addressed to a node outside the topology.
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),

    /// A packet was addressed to a node that is not a sink.
    #[error("Destination {0} is not a sink")]
    NotASink(NodeId),
}
