//! Connection Graph - the adjacency index over thought ids.
//!
//! The graph never owns thought records; it stores weighted, typed edges
//! between ids and leaves the records to the thought store. Reference
//! validation against the store happens in the engine, which can see both.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use thought_store::ThoughtId;

/// Kinds of connections between thoughts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionKind {
    /// Discovered lexical echo between two thoughts.
    Reflection,
    /// One thought shaped another.
    Influence,
}

/// Directed edge from a source thought to a target thought.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    pub target: ThoughtId,
    pub kind: ConnectionKind,
    /// Strength from 0.0 to 1.0.
    pub strength: f32,
    pub discovered_at: DateTime<Utc>,
}

impl Connection {
    /// Create a new connection, clamping strength into [0, 1].
    pub fn new(target: ThoughtId, kind: ConnectionKind, strength: f32) -> Self {
        Self {
            target,
            kind,
            strength: strength.clamp(0.0, 1.0),
            discovered_at: Utc::now(),
        }
    }
}

/// The mutable graph of discovered connections.
///
/// Adjacency lists are keyed by source id. There is never more than one edge
/// per `(source, target, kind)` triple; re-discovery replaces the strength
/// rather than accumulating it.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConnectionGraph {
    edges: HashMap<ThoughtId, Vec<Connection>>,
}

impl ConnectionGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent upsert of one edge.
    pub fn upsert(&mut self, source: ThoughtId, connection: Connection) {
        let outgoing = self.edges.entry(source).or_default();
        if let Some(existing) = outgoing
            .iter_mut()
            .find(|c| c.target == connection.target && c.kind == connection.kind)
        {
            existing.strength = connection.strength;
        } else {
            outgoing.push(connection);
        }
    }

    /// All outgoing edges of a thought, in discovery order.
    pub fn neighbors(&self, id: ThoughtId) -> &[Connection] {
        self.edges.get(&id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Check whether a specific edge exists.
    pub fn has_connection(&self, source: ThoughtId, target: ThoughtId) -> bool {
        self.neighbors(source).iter().any(|c| c.target == target)
    }

    /// Number of source nodes with at least one outgoing edge.
    pub fn node_count(&self) -> usize {
        self.edges.len()
    }

    /// Total number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    /// Iterate over all (source, connection) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (ThoughtId, &Connection)> {
        self.edges
            .iter()
            .flat_map(|(source, conns)| conns.iter().map(move |c| (*source, c)))
    }
}
