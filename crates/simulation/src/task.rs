//! Tasks multiplexed on the event loop.
//!
//! Each variant is one resumption of a logical task: the scheduler pops it at
//! its wake-up time and runs it to completion. Continuing work is expressed by
//! scheduling another task, never by recursion.

use floodsim_types::{NodeId, Packet};

/// A unit of work waiting in the [`EventQueue`](crate::EventQueue).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// A sensor's packet generator wakes up.
    Generate { node: NodeId },

    /// A single externally injected packet is created at `origin`.
    Inject { origin: NodeId, destination: NodeId },

    /// A packet copy arrives at `node` and must be routed.
    Arrive { node: NodeId, packet: Packet },

    /// A sequential router at `node` resumes to transmit to its `next`-th neighbor.
    Transmit {
        node: NodeId,
        packet: Packet,
        next: usize,
    },
}

impl Task {
    /// Node the task runs at.
    pub fn node(&self) -> NodeId {
        match self {
            Task::Generate { node }
            | Task::Arrive { node, .. }
            | Task::Transmit { node, .. } => *node,
            Task::Inject { origin, .. } => *origin,
        }
    }
}
