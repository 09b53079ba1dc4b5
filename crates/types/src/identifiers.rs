//! Domain-specific identifier types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Node identifier within a topology snapshot.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Get the raw value.
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

impl From<u32> for NodeId {
    fn from(value: u32) -> Self {
        NodeId(value)
    }
}

/// Per-origin packet sequence number.
///
/// Sequence numbers start at 0 for every origin and increase by one for each
/// packet that origin creates during a run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PacketSeq(pub u64);

impl PacketSeq {
    /// First sequence number handed out to an origin.
    pub const FIRST: Self = PacketSeq(0);

    /// Get the next sequence number.
    pub fn next(self) -> Self {
        PacketSeq(self.0 + 1)
    }
}

impl fmt::Display for PacketSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Packet identity: the origin node plus its per-origin sequence number.
///
/// Shared by every forwarded copy of a packet.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PacketId {
    pub origin: NodeId,
    pub seq: PacketSeq,
}

impl PacketId {
    /// Create a packet identity.
    pub fn new(origin: NodeId, seq: PacketSeq) -> Self {
        Self { origin, seq }
    }
}

impl fmt::Display for PacketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Packet({}-{})", self.origin.0, self.seq)
    }
}
