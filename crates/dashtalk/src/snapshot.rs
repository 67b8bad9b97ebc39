//! Snapshot Codec
//!
//! [`GraphSnapshot`] is the plain serializable representation of a
//! [`DialogueGraph`]: every node and link, in store order, with no behavior
//! attached. It serves two roles:
//!
//! - the consistent point-in-time view the compiler traverses, and
//! - the opaque text artifact the embedding editor persists and reloads
//!   (where and how it is stored is outside this crate's scope).
//!
//! `from_snapshot(to_snapshot(g))` is lossless for any graph built through
//! the store. Loading is deliberately permissive: a link whose source node
//! is missing is dropped with a warning instead of failing the whole load,
//! mirroring the compiler's treatment of stale links. Dangling targets are
//! a legal state and are preserved.

use crate::graph::{DialogueGraph, Link};
use crate::node::Node;
use serde::{Deserialize, Serialize};

/// Point-in-time, read-only copy of a graph's nodes and links.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// Nodes in store (insertion) order.
    pub nodes: Vec<Node>,
    /// Links in store (insertion) order.
    pub links: Vec<Link>,
}

impl GraphSnapshot {
    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of links.
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Pretty-printed JSON for persistence.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Serialization`] if encoding fails.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Compact JSON (smaller artifact, same content).
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Serialization`] if encoding fails.
    pub fn to_json_compact(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a snapshot from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Serialization`] if the text is not a valid
    /// snapshot.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl DialogueGraph {
    /// Consistent point-in-time view of the graph.
    ///
    /// The snapshot owns its data, so later mutations of the store can
    /// never be observed through it.
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes.values().cloned().collect(),
            links: self.links.values().cloned().collect(),
        }
    }

    /// Rebuild a graph from a snapshot.
    ///
    /// Links whose source node is not present in the snapshot are stale and
    /// dropped with a warning; everything else is restored verbatim,
    /// including dangling targets.
    pub fn from_snapshot(snapshot: GraphSnapshot) -> Self {
        let mut graph = DialogueGraph::new();
        for node in snapshot.nodes {
            graph.nodes.insert(node.id, node);
        }
        for link in snapshot.links {
            if !graph.nodes.contains_key(&link.source.node) {
                tracing::warn!(link = %link.id, source = %link.source.node, "dropping stale link with unknown source");
                continue;
            }
            graph.links.insert(link.id, link);
        }
        graph
    }
}
