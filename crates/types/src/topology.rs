//! Topology snapshot: nodes, roles and undirected links.

use crate::NodeId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use thiserror::Error;

/// Errors raised while building a topology.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    /// An edge or lookup referenced a node that is not in the topology.
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),

    /// An edge connected a node to itself.
    #[error("Self-loop on {0}")]
    SelfLoop(NodeId),

    /// A node identifier was added twice.
    #[error("Duplicate node: {0}")]
    DuplicateNode(NodeId),
}

/// Role of a node in the sensor network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Originates traffic.
    Sensor,
    /// Packet destination (base station).
    #[serde(alias = "base_station")]
    Sink,
}

/// Display position of a node. Ignored by routing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone)]
struct NodeEntry {
    role: Role,
    position: Option<Position>,
    /// Neighbors in the order their links were added.
    neighbors: Vec<NodeId>,
}

/// Immutable-per-run snapshot of the network.
///
/// Nodes keep their insertion order, and each node's neighbor list keeps
/// link insertion order. Routing iterates neighbors in that order, which is
/// what makes a seeded run replayable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "TopologyFile", into = "TopologyFile")]
pub struct Topology {
    nodes: IndexMap<NodeId, NodeEntry>,
    edge_count: usize,
}

impl Topology {
    /// Create an empty topology.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a path `0 - 1 - ... - (n-1)` of sensors whose last node is the sink.
    pub fn path(n: u32) -> Self {
        let mut topology = Self::new();
        for i in 0..n {
            let role = if i + 1 == n { Role::Sink } else { Role::Sensor };
            topology.insert_unchecked(NodeId(i), role);
        }
        for i in 1..n {
            topology.link_unchecked(NodeId(i - 1), NodeId(i));
        }
        topology
    }

    /// Build a star: node 0 is a sink hub, nodes `1..=leaves` are sensors.
    pub fn star(leaves: u32) -> Self {
        let mut topology = Self::new();
        topology.insert_unchecked(NodeId(0), Role::Sink);
        for i in 1..=leaves {
            topology.insert_unchecked(NodeId(i), Role::Sensor);
            topology.link_unchecked(NodeId(0), NodeId(i));
        }
        topology
    }

    /// Add a node.
    pub fn add_node(&mut self, id: NodeId, role: Role) -> Result<(), TopologyError> {
        if self.nodes.contains_key(&id) {
            return Err(TopologyError::DuplicateNode(id));
        }
        self.insert_unchecked(id, role);
        Ok(())
    }

    /// Add a node with a display position.
    pub fn add_node_at(
        &mut self,
        id: NodeId,
        role: Role,
        position: Position,
    ) -> Result<(), TopologyError> {
        self.add_node(id, role)?;
        if let Some(entry) = self.nodes.get_mut(&id) {
            entry.position = Some(position);
        }
        Ok(())
    }

    /// Add an undirected link. Adding an existing link is a no-op.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> Result<(), TopologyError> {
        if a == b {
            return Err(TopologyError::SelfLoop(a));
        }
        for id in [a, b] {
            if !self.nodes.contains_key(&id) {
                return Err(TopologyError::UnknownNode(id));
            }
        }
        self.link_unchecked(a, b);
        Ok(())
    }

    /// Remove a node and every link touching it.
    ///
    /// Used between runs; remaining nodes keep their relative order.
    pub fn remove_node(&mut self, id: NodeId) -> Result<Role, TopologyError> {
        let entry = self
            .nodes
            .shift_remove(&id)
            .ok_or(TopologyError::UnknownNode(id))?;

        for neighbor in &entry.neighbors {
            if let Some(other) = self.nodes.get_mut(neighbor) {
                other.neighbors.retain(|n| *n != id);
            }
        }
        self.edge_count -= entry.neighbors.len();

        Ok(entry.role)
    }

    /// Neighbors of a node in link insertion order. Empty for unknown nodes.
    pub fn neighbors(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(&id)
            .map(|entry| entry.neighbors.as_slice())
            .unwrap_or(&[])
    }

    /// Role of a node.
    pub fn role(&self, id: NodeId) -> Option<Role> {
        self.nodes.get(&id).map(|entry| entry.role)
    }

    /// Display position of a node, if one was given.
    pub fn position(&self, id: NodeId) -> Option<Position> {
        self.nodes.get(&id).and_then(|entry| entry.position)
    }

    /// Whether the node exists.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Sink nodes, in insertion order.
    pub fn sinks(&self) -> Vec<NodeId> {
        self.nodes_with_role(Role::Sink)
    }

    /// Sensor nodes, in insertion order.
    pub fn sensors(&self) -> Vec<NodeId> {
        self.nodes_with_role(Role::Sensor)
    }

    /// Whether at least one sink exists.
    pub fn has_sink(&self) -> bool {
        self.nodes.values().any(|entry| entry.role == Role::Sink)
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of undirected links.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Check if the topology has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Undirected links, each reported once, ordered by their first endpoint.
    pub fn edges(&self) -> Vec<(NodeId, NodeId)> {
        let mut edges = Vec::with_capacity(self.edge_count);
        for (index, (id, entry)) in self.nodes.iter().enumerate() {
            for neighbor in &entry.neighbors {
                if self.nodes.get_index_of(neighbor) > Some(index) {
                    edges.push((*id, *neighbor));
                }
            }
        }
        edges
    }

    /// Unweighted hop distance from `from` to every node it can reach.
    pub fn hop_distances(&self, from: NodeId) -> HashMap<NodeId, u32> {
        let mut distances = HashMap::new();
        if !self.contains(from) {
            return distances;
        }

        let mut queue = VecDeque::new();
        distances.insert(from, 0);
        queue.push_back(from);

        while let Some(node) = queue.pop_front() {
            let next = distances[&node] + 1;
            for &neighbor in self.neighbors(node) {
                if !distances.contains_key(&neighbor) {
                    distances.insert(neighbor, next);
                    queue.push_back(neighbor);
                }
            }
        }

        distances
    }

    fn nodes_with_role(&self, role: Role) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, entry)| entry.role == role)
            .map(|(id, _)| *id)
            .collect()
    }

    fn insert_unchecked(&mut self, id: NodeId, role: Role) {
        self.nodes.insert(
            id,
            NodeEntry {
                role,
                position: None,
                neighbors: Vec::new(),
            },
        );
    }

    fn link_unchecked(&mut self, a: NodeId, b: NodeId) {
        if self.neighbors(a).contains(&b) {
            return;
        }
        if let Some(entry) = self.nodes.get_mut(&a) {
            entry.neighbors.push(b);
        }
        if let Some(entry) = self.nodes.get_mut(&b) {
            entry.neighbors.push(a);
        }
        self.edge_count += 1;
    }
}

/// Serialized form of a topology (scenario files, JSON output).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopologyFile {
    #[serde(default)]
    pub nodes: Vec<NodeSpec>,
    #[serde(default)]
    pub edges: Vec<(NodeId, NodeId)>,
}

/// One node entry in a [`TopologyFile`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSpec {
    pub id: NodeId,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl TryFrom<TopologyFile> for Topology {
    type Error = TopologyError;

    fn try_from(file: TopologyFile) -> Result<Self, Self::Error> {
        let mut topology = Topology::new();
        for node in file.nodes {
            match node.position {
                Some(position) => topology.add_node_at(node.id, node.role, position)?,
                None => topology.add_node(node.id, node.role)?,
            }
        }
        for (a, b) in file.edges {
            topology.add_edge(a, b)?;
        }
        Ok(topology)
    }
}

impl From<Topology> for TopologyFile {
    fn from(topology: Topology) -> Self {
        let edges = topology.edges();
        let nodes = topology
            .nodes
            .into_iter()
            .map(|(id, entry)| NodeSpec {
                id,
                role: entry.role,
                position: entry.position,
            })
            .collect();
        TopologyFile { nodes, edges }
    }
}
