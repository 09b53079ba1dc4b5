//! Core types for floodsim.
//!
//! These are plain values shared by the simulation engine and its hosts:
//!
//! - [`NodeId`], [`PacketSeq`], [`PacketId`]: identifiers
//! - [`Topology`]: the node/role/link snapshot a run floods over
//! - [`Packet`]: one per-path copy of a packet

mod identifiers;
mod packet;
mod topology;

pub use identifiers::{NodeId, PacketId, PacketSeq};
pub use packet::Packet;
pub use topology::{NodeSpec, Position, Role, Topology, TopologyError, TopologyFile};
