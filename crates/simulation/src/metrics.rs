//! Metrics collection for a single run.

use crate::config::as_units;
use floodsim_types::{NodeId, Packet, PacketId};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::time::Duration;

/// One delivered packet, as observed at its sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Delivery {
    /// Identity of the delivered packet.
    pub packet: PacketId,
    /// Sink that received it.
    pub sink: NodeId,
    /// Hops travelled by the first copy to arrive.
    pub hops: u32,
    /// Time from creation to delivery.
    #[serde(serialize_with = "serialize_units")]
    pub latency: Duration,
    /// Simulated time of delivery.
    #[serde(serialize_with = "serialize_units")]
    pub delivered_at: Duration,
}

/// Final metrics of one run.
///
/// `latencies`, `hop_counts` and `deliveries` are in delivery order.
/// `forwarding_count` only has entries for nodes that forwarded at least once.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FloodMetrics {
    /// Packets created by generators or injection.
    pub generated: u64,
    /// Packets whose first copy reached their destination sink.
    pub delivered: u64,
    /// Creation-to-delivery time per delivered packet.
    #[serde(serialize_with = "serialize_units_seq")]
    pub latencies: Vec<Duration>,
    /// Hop count per delivered packet.
    pub hop_counts: Vec<u32>,
    /// Number of packets each node relayed.
    pub forwarding_count: BTreeMap<NodeId, u64>,
    /// Per-packet delivery log.
    pub deliveries: Vec<Delivery>,
}

impl FloodMetrics {
    /// Check if nothing happened during the run.
    pub fn is_empty(&self) -> bool {
        self.generated == 0
            && self.delivered == 0
            && self.latencies.is_empty()
            && self.hop_counts.is_empty()
            && self.forwarding_count.is_empty()
    }

    /// Fraction of generated packets that were delivered (0 when nothing was generated).
    pub fn delivery_ratio(&self) -> f64 {
        if self.generated == 0 {
            0.0
        } else {
            self.delivered as f64 / self.generated as f64
        }
    }

    /// Mean latency in time units, if anything was delivered.
    pub fn mean_latency(&self) -> Option<f64> {
        if self.latencies.is_empty() {
            return None;
        }
        let total: f64 = self.latencies.iter().copied().map(as_units).sum();
        Some(total / self.latencies.len() as f64)
    }

    /// Mean hop count, if anything was delivered.
    pub fn mean_hops(&self) -> Option<f64> {
        if self.hop_counts.is_empty() {
            return None;
        }
        let total: u64 = self.hop_counts.iter().map(|h| u64::from(*h)).sum();
        Some(total as f64 / self.hop_counts.len() as f64)
    }

    /// Forwarding count of a node (0 if it never forwarded).
    pub fn forwarded_by(&self, node: NodeId) -> u64 {
        self.forwarding_count.get(&node).copied().unwrap_or(0)
    }

    /// Total forwarding operations across all nodes.
    pub fn total_forwards(&self) -> u64 {
        self.forwarding_count.values().sum()
    }
}

/// Accumulates metrics while a run is in progress.
///
/// Owned by one run's context; every update happens inside a single task
/// step, so no synchronisation is needed.
#[derive(Debug, Default)]
pub struct MetricsCollector {
    metrics: FloodMetrics,
}

impl MetricsCollector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly created packet.
    pub fn record_generated(&mut self) {
        self.metrics.generated += 1;
    }

    /// Record the first arrival of a packet at its destination.
    pub fn record_delivery(&mut self, packet: &Packet, sink: NodeId, now: Duration) {
        let latency = packet.age(now);
        self.metrics.delivered += 1;
        self.metrics.latencies.push(latency);
        self.metrics.hop_counts.push(packet.hops);
        self.metrics.deliveries.push(Delivery {
            packet: packet.id,
            sink,
            hops: packet.hops,
            latency,
            delivered_at: now,
        });
        debug_assert!(self.metrics.delivered <= self.metrics.generated);
    }

    /// Record a node relaying a packet.
    pub fn record_forward(&mut self, node: NodeId) {
        *self.metrics.forwarding_count.entry(node).or_insert(0) += 1;
    }

    /// Metrics collected so far.
    pub fn current(&self) -> &FloodMetrics {
        &self.metrics
    }

    /// Finish collection.
    pub fn finish(self) -> FloodMetrics {
        self.metrics
    }
}

pub(crate) fn serialize_units<S: Serializer>(
    value: &Duration,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(as_units(*value))
}

#[allow(clippy::ptr_arg)]
fn serialize_units_seq<S: Serializer>(
    values: &Vec<Duration>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(values.iter().copied().map(as_units))
}

#[cfg(test)]
mod tests {
    use super::*;
    use floodsim_types::PacketSeq;

    fn packet(origin: u32, hops: u32, created: u64) -> Packet {
        let mut packet = Packet::new(
            PacketId::new(NodeId(origin), PacketSeq(0)),
            NodeId(0),
            Duration::from_secs(created),
        );
        packet.hops = hops;
        packet
    }

    #[test]
    fn test_empty_collector() {
        let metrics = MetricsCollector::new().finish();
        assert!(metrics.is_empty());
        assert_eq!(metrics.delivery_ratio(), 0.0);
        assert_eq!(metrics.mean_latency(), None);
        assert_eq!(metrics.mean_hops(), None);
    }

    #[test]
    fn test_record_delivery() {
        let mut collector = MetricsCollector::new();
        collector.record_generated();
        collector.record_generated();
        collector.record_delivery(&packet(3, 2, 1), NodeId(0), Duration::from_secs(4));

        let metrics = collector.finish();
        assert_eq!(metrics.generated, 2);
        assert_eq!(metrics.delivered, 1);
        assert_eq!(metrics.latencies, vec![Duration::from_secs(3)]);
        assert_eq!(metrics.hop_counts, vec![2]);
        assert_eq!(metrics.delivery_ratio(), 0.5);
        assert_eq!(metrics.mean_latency(), Some(3.0));
        assert_eq!(metrics.deliveries[0].sink, NodeId(0));
        assert_eq!(metrics.deliveries[0].delivered_at, Duration::from_secs(4));
    }

    #[test]
    fn test_forwarding_counts() {
        let mut collector = MetricsCollector::new();
        collector.record_forward(NodeId(2));
        collector.record_forward(NodeId(2));
        collector.record_forward(NodeId(5));

        let metrics = collector.finish();
        assert_eq!(metrics.forwarded_by(NodeId(2)), 2);
        assert_eq!(metrics.forwarded_by(NodeId(5)), 1);
        assert_eq!(metrics.forwarded_by(NodeId(9)), 0);
        assert_eq!(metrics.total_forwards(), 3);
    }

    #[test]
    fn test_serializes_durations_as_units() {
        let mut collector = MetricsCollector::new();
        collector.record_generated();
        collector.record_delivery(&packet(1, 1, 0), NodeId(0), Duration::from_millis(1500));

        let json = serde_json::to_value(collector.finish()).unwrap();
        assert_eq!(json["latencies"][0], 1.5);
        assert_eq!(json["deliveries"][0]["delivered_at"], 1.5);
    }
}
