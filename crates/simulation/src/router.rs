//! Flood routing with first-arrival-wins loop suppression.

use crate::config::{as_units, ForwardingSchedule};
use crate::context::SimulationContext;
use crate::event_queue::EventQueue;
use crate::task::Task;
use floodsim_types::{NodeId, Packet, Topology};
use std::time::Duration;
use tracing::{debug, trace};

/// What a router did with an arriving packet copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// The node had already handled this packet; the copy was dropped.
    Duplicate,
    /// The node is the destination; the packet was delivered.
    Delivered,
    /// The node relayed the packet. `transmissions` copies were put on the air
    /// right away (sequential routers transmit later, one per resume).
    Forwarded { transmissions: usize },
}

/// Per-node forwarding decision.
///
/// The router never recurses: every copy it sends is a new task on the
/// queue, so flood depth is bounded by the queue, not the call stack.
#[derive(Debug, Clone, Copy)]
pub struct FloodRouter {
    hop_delay: Duration,
    schedule: ForwardingSchedule,
}

impl FloodRouter {
    /// Create a router with a uniform per-hop delay.
    pub fn new(hop_delay: Duration, schedule: ForwardingSchedule) -> Self {
        Self {
            hop_delay,
            schedule,
        }
    }

    /// Handle a packet copy arriving at `node` at time `now`.
    ///
    /// 1. Drop it if `node` has already seen this packet.
    /// 2. Deliver it if `node` is the destination.
    /// 3. Otherwise count a forward and send a copy to every neighbor.
    pub fn on_arrival(
        &self,
        context: &mut SimulationContext,
        queue: &mut EventQueue,
        topology: &Topology,
        node: NodeId,
        packet: Packet,
        now: Duration,
    ) -> RouteOutcome {
        if !context.forwarding_mut().mark_seen(node, packet.id) {
            trace!(packet = %packet.id, %node, hops = packet.hops, "Duplicate dropped");
            return RouteOutcome::Duplicate;
        }

        if node == packet.destination {
            context.metrics_mut().record_delivery(&packet, node, now);
            debug!(
                packet = %packet.id,
                origin = %packet.origin(),
                sink = %node,
                hops = packet.hops,
                latency = as_units(packet.age(now)),
                "Packet delivered"
            );
            return RouteOutcome::Delivered;
        }

        context.metrics_mut().record_forward(node);

        let neighbors = topology.neighbors(node);
        let wake = now.saturating_add(self.hop_delay);
        match self.schedule {
            ForwardingSchedule::Concurrent => {
                for &neighbor in neighbors {
                    queue.schedule(
                        wake,
                        Task::Arrive {
                            node: neighbor,
                            packet: packet.forwarded(),
                        },
                    );
                }
                RouteOutcome::Forwarded {
                    transmissions: neighbors.len(),
                }
            }
            ForwardingSchedule::Sequential => {
                if !neighbors.is_empty() {
                    queue.schedule(
                        wake,
                        Task::Transmit {
                            node,
                            packet,
                            next: 0,
                        },
                    );
                }
                RouteOutcome::Forwarded { transmissions: 0 }
            }
        }
    }

    /// Resume a sequential router: hand a copy to the `next`-th neighbor and,
    /// if neighbors remain, wait one more hop delay.
    ///
    /// Returns true if a copy was sent.
    pub fn on_transmit(
        &self,
        queue: &mut EventQueue,
        topology: &Topology,
        node: NodeId,
        packet: Packet,
        next: usize,
        now: Duration,
    ) -> bool {
        let neighbors = topology.neighbors(node);
        let Some(&neighbor) = neighbors.get(next) else {
            return false;
        };

        trace!(packet = %packet.id, from = %node, to = %neighbor, "Transmit");
        queue.schedule(
            now,
            Task::Arrive {
                node: neighbor,
                packet: packet.forwarded(),
            },
        );

        if next + 1 < neighbors.len() {
            queue.schedule(
                now.saturating_add(self.hop_delay),
                Task::Transmit {
                    node,
                    packet,
                    next: next + 1,
                },
            );
        }
        true
    }
}
