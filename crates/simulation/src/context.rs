//! Per-run mutable state.

use crate::forwarding::ForwardingRecord;
use crate::metrics::{FloodMetrics, MetricsCollector};
use floodsim_types::{NodeId, PacketId, PacketSeq};
use std::collections::HashMap;

/// Everything a run mutates: forwarding records, metrics and per-origin
/// sequence counters.
///
/// A context is created empty for every run and consumed when the run ends;
/// it is never reused by a later run.
#[derive(Debug, Default)]
pub struct SimulationContext {
    forwarding: ForwardingRecord,
    metrics: MetricsCollector,
    next_seq: HashMap<NodeId, PacketSeq>,
}

impl SimulationContext {
    /// Create a fresh, empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next packet identity for `origin`.
    pub fn allocate_packet_id(&mut self, origin: NodeId) -> PacketId {
        let seq = self.next_seq.entry(origin).or_insert(PacketSeq::FIRST);
        let id = PacketId::new(origin, *seq);
        *seq = seq.next();
        id
    }

    /// Forwarding records of this run.
    pub fn forwarding(&self) -> &ForwardingRecord {
        &self.forwarding
    }

    /// Mutable forwarding records of this run.
    pub fn forwarding_mut(&mut self) -> &mut ForwardingRecord {
        &mut self.forwarding
    }

    /// Metrics collected so far.
    pub fn metrics(&self) -> &FloodMetrics {
        self.metrics.current()
    }

    /// Mutable metrics collector.
    pub fn metrics_mut(&mut self) -> &mut MetricsCollector {
        &mut self.metrics
    }

    /// End the run and harvest its metrics.
    pub fn into_metrics(self) -> FloodMetrics {
        self.metrics.finish()
    }
}
