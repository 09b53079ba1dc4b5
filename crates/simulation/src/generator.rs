//! Poisson packet generation at sensor nodes.

use crate::context::SimulationContext;
use floodsim_types::{NodeId, Packet};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::Exp;
use std::time::Duration;
use tracing::debug;

/// Generates packets for every sensor of a run.
///
/// The generator itself is stateless across sensors: each sensor's task
/// carries only its node id, and all per-run state lives in the
/// [`SimulationContext`].
#[derive(Debug, Clone)]
pub struct PacketGenerator {
    /// Candidate destinations, in topology order.
    sinks: Vec<NodeId>,

    /// Inter-arrival distribution.
    interval: Exp<f64>,
}

impl PacketGenerator {
    /// Create a generator. Returns `None` if there is no sink to send to.
    pub fn new(sinks: Vec<NodeId>, interval: Exp<f64>) -> Option<Self> {
        if sinks.is_empty() {
            return None;
        }
        Some(Self { sinks, interval })
    }

    /// Draw the time until a sensor's next packet.
    ///
    /// Saturates at [`Duration::MAX`] for draws too large to represent.
    pub fn next_interval(&self, rng: &mut impl Rng) -> Duration {
        let units: f64 = rng.sample(self.interval);
        Duration::try_from_secs_f64(units).unwrap_or(Duration::MAX)
    }

    /// Pick a destination sink uniformly at random.
    pub fn choose_destination(&self, rng: &mut impl Rng) -> NodeId {
        // `new` guarantees at least one sink.
        self.sinks
            .choose(rng)
            .copied()
            .unwrap_or_else(|| self.sinks[0])
    }

    /// Create a packet at `origin`, counting it as generated.
    pub fn generate_one(
        &self,
        context: &mut SimulationContext,
        origin: NodeId,
        now: Duration,
        rng: &mut impl Rng,
    ) -> Packet {
        let destination = self.choose_destination(rng);
        let id = context.allocate_packet_id(origin);
        context.metrics_mut().record_generated();

        debug!(packet = %id, %destination, now = now.as_secs_f64(), "Packet generated");

        Packet::new(id, destination, now)
    }
}
