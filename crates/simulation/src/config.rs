//! Run configuration for the flooding simulation.

use crate::SimulationError;
use rand_distr::Exp;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Seed used when the caller does not supply one.
pub const DEFAULT_SEED: u64 = 12345;

/// Convert simulated time units to a [`Duration`] (one unit is one second).
///
/// Returns `None` for negative, NaN or unrepresentable values.
pub fn time_units(value: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(value).ok()
}

/// Convert a [`Duration`] back to simulated time units.
pub fn as_units(duration: Duration) -> f64 {
    duration.as_secs_f64()
}

/// How a router spaces its transmissions to neighbors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForwardingSchedule {
    /// Every neighbor branch waits one hop delay independently, so all
    /// neighbors receive their copy at the same time. First arrivals follow
    /// shortest paths.
    #[default]
    Concurrent,

    /// Neighbors are served one after another; the k-th neighbor (0-based)
    /// receives its copy `k + 1` hop delays after the router ran.
    Sequential,
}

/// Configuration for a single simulation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Simulated-time cutoff. Events at or after the horizon never run.
    pub horizon: f64,

    /// Mean of the exponential inter-arrival time between packets of one sensor.
    pub mean_interval: f64,

    /// Per-hop transmission delay, identical for every link.
    pub hop_delay: f64,

    /// Transmission spacing used by routers.
    pub forwarding: ForwardingSchedule,

    /// Seed for the run's random source.
    pub seed: u64,
}

impl SimulationConfig {
    /// Create a configuration with the given horizon and default parameters.
    pub fn new(horizon: f64) -> Self {
        Self {
            horizon,
            ..Default::default()
        }
    }

    /// Set the horizon.
    pub fn with_horizon(mut self, horizon: f64) -> Self {
        self.horizon = horizon;
        self
    }

    /// Set the mean packet inter-arrival time.
    pub fn with_mean_interval(mut self, mean_interval: f64) -> Self {
        self.mean_interval = mean_interval;
        self
    }

    /// Set the per-hop delay.
    pub fn with_hop_delay(mut self, hop_delay: f64) -> Self {
        self.hop_delay = hop_delay;
        self
    }

    /// Set the forwarding schedule.
    pub fn with_forwarding(mut self, forwarding: ForwardingSchedule) -> Self {
        self.forwarding = forwarding;
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check every parameter and convert it to the engine's representation.
    pub fn validate(&self) -> Result<Timing, SimulationError> {
        let horizon =
            time_units(self.horizon).ok_or(SimulationError::InvalidHorizon(self.horizon))?;

        // A mean below the clock resolution would never advance simulated time.
        let mean = self.mean_interval;
        let rate = 1.0 / mean;
        let interval = time_units(mean)
            .filter(|units| !units.is_zero() && rate.is_finite())
            .and_then(|_| Exp::new(rate).ok())
            .ok_or(SimulationError::InvalidMeanInterval(mean))?;

        let hop_delay = time_units(self.hop_delay)
            .filter(|delay| !delay.is_zero())
            .ok_or(SimulationError::InvalidHopDelay(self.hop_delay))?;

        Ok(Timing {
            horizon,
            hop_delay,
            interval,
            forwarding: self.forwarding,
        })
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            horizon: 100.0,
            mean_interval: 10.0,
            hop_delay: 1.0,
            forwarding: ForwardingSchedule::default(),
            seed: DEFAULT_SEED,
        }
    }
}

/// Validated timing parameters of a run.
#[derive(Clone, Copy, Debug)]
pub struct Timing {
    pub horizon: Duration,
    pub hop_delay: Duration,
    pub interval: Exp<f64>,
    pub forwarding: ForwardingSchedule,
}
