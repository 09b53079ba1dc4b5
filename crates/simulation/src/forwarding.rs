//! Per-node forwarding records.

use floodsim_types::{NodeId, PacketId};
use std::collections::{HashMap, HashSet};

/// Tracks which packet identities each node has already handled.
///
/// First arrival wins: the first copy of a packet to reach a node is recorded
/// and processed, every later copy of the same packet at that node is dropped.
/// Records live for exactly one run.
#[derive(Debug, Default)]
pub struct ForwardingRecord {
    /// node -> packet identities seen at that node
    seen: HashMap<NodeId, HashSet<PacketId>>,
}

impl ForwardingRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a packet at a node. Returns true if this is its first arrival there.
    ///
    /// The caller should only route the packet if this returns true.
    pub fn mark_seen(&mut self, node: NodeId, packet: PacketId) -> bool {
        self.seen.entry(node).or_default().insert(packet)
    }

    /// Check if a node has already handled a packet.
    pub fn has_seen(&self, node: NodeId, packet: PacketId) -> bool {
        self.seen
            .get(&node)
            .is_some_and(|packets| packets.contains(&packet))
    }

    /// Number of distinct packets a node has handled.
    pub fn packets_at(&self, node: NodeId) -> usize {
        self.seen.get(&node).map_or(0, HashSet::len)
    }

    /// Total (node, packet) pairs recorded.
    pub fn len(&self) -> usize {
        self.seen.values().map(HashSet::len).sum()
    }

    /// Check if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.seen.values().all(HashSet::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floodsim_types::PacketSeq;

    #[test]
    fn test_first_arrival_wins() {
        let mut record = ForwardingRecord::new();
        let p1 = PacketId::new(NodeId(0), PacketSeq(0));
        let p2 = PacketId::new(NodeId(0), PacketSeq(1));

        // First arrival at node 1 returns true
        assert!(record.mark_seen(NodeId(1), p1));

        // Second arrival of the same packet at node 1 returns false
        assert!(!record.mark_seen(NodeId(1), p1));

        // Same packet at a different node is a first arrival there
        assert!(record.mark_seen(NodeId(2), p1));

        // Different packet at node 1 is a first arrival
        assert!(record.mark_seen(NodeId(1), p2));

        assert!(record.has_seen(NodeId(1), p2));
        assert!(!record.has_seen(NodeId(2), p2));
        assert_eq!(record.packets_at(NodeId(1)), 2);
        assert_eq!(record.packets_at(NodeId(9)), 0);
        assert_eq!(record.len(), 3);
    }

    #[test]
    fn test_empty() {
        let record = ForwardingRecord::new();
        assert!(record.is_empty());
        assert_eq!(record.len(), 0);
    }
}
