//! Packet values carried by the flood router.

use crate::{NodeId, PacketId};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One copy of a packet travelling along a specific path.
///
/// A packet is never mutated in place: each edge traversal produces a fresh
/// copy via [`Packet::forwarded`], so sibling branches of a flood never share
/// per-copy state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Packet {
    /// Identity shared by every copy of this packet.
    pub id: PacketId,

    /// Sink this packet is addressed to.
    pub destination: NodeId,

    /// Simulated time at which the origin created the packet.
    pub created_at: Duration,

    /// Number of edges this copy has traversed.
    pub hops: u32,
}

impl Packet {
    /// Create a fresh packet at its origin (hop count 0).
    pub fn new(id: PacketId, destination: NodeId, created_at: Duration) -> Self {
        Self {
            id,
            destination,
            created_at,
            hops: 0,
        }
    }

    /// Node that created this packet.
    pub fn origin(&self) -> NodeId {
        self.id.origin
    }

    /// The copy handed to a neighbor: same identity, one more hop.
    pub fn forwarded(&self) -> Self {
        Self {
            hops: self.hops + 1,
            ..*self
        }
    }

    /// Time elapsed since creation, as observed at `now`.
    pub fn age(&self, now: Duration) -> Duration {
        now.saturating_sub(self.created_at)
    }
}
