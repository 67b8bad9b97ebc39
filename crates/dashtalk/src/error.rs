// Copyright 2026 Dropbox (created by Andrew Yates <ayates@dropbox.com>)

//! Error types for DashTalk
//!
//! Every mutation failure is reported through one crate-level [`Error`] enum
//! so callers (typically the editor UI) can pattern-match on the exact rule
//! that rejected a command and surface it as interaction feedback.
//!
//! Removal operations (`remove_node`, `remove_link`) are idempotent and never
//! produce [`Error::UnknownNode`] / [`Error::UnknownLink`]; field and port
//! operations on missing ids are hard failures.

use crate::graph::LinkId;
use crate::kind::{NodeKind, PortPolarity};
use crate::node::NodeId;
use thiserror::Error;

/// DashTalk error types
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    /// Operation referenced a node id that is not in the graph
    #[error("Node '{0}' not found in graph")]
    UnknownNode(NodeId),

    /// Operation referenced a link id that is not in the graph
    #[error("Link '{0}' not found in graph")]
    UnknownLink(LinkId),

    /// Field name is not part of the node kind's schema
    #[error("Node kind '{kind}' has no field '{field}'")]
    InvalidField {
        /// Kind whose schema was consulted.
        kind: NodeKind,
        /// The rejected field name.
        field: String,
    },

    /// Source and target kinds violate the adjacency rule
    #[error("A '{source_kind}' output may not connect to a '{target}' input")]
    IllegalConnection {
        /// Kind of the link's source node.
        source_kind: NodeKind,
        /// Kind of the candidate target node.
        target: NodeKind,
    },

    /// Output port already carries its maximum number of outgoing links
    #[error("Port '{port}' on node '{node}' already carries an outgoing link")]
    PortSaturated {
        /// Node owning the saturated port.
        node: NodeId,
        /// The saturated port id.
        port: String,
    },

    /// A link's source and target must be different nodes
    #[error("A link may not connect node '{0}' to itself")]
    SelfLoop(NodeId),

    /// Port does not exist on the node, or has the wrong polarity for
    /// the requested link endpoint
    #[error("Port '{port}' on node '{node}' cannot serve as the link's {expected} endpoint")]
    PolarityMismatch {
        /// Node whose port was checked.
        node: NodeId,
        /// The rejected port id.
        port: String,
        /// Polarity the endpoint requires.
        expected: PortPolarity,
    },

    /// Snapshot encode/decode error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for DashTalk operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns true if the error means the referenced id does not exist.
    pub fn is_unknown_id(&self) -> bool {
        matches!(self, Error::UnknownNode(_) | Error::UnknownLink(_))
    }

    /// Returns true if the error is a rejected link-creation rule.
    ///
    /// These are the errors an editor UI turns into connection feedback
    /// rather than reporting as faults.
    pub fn is_rejected_connection(&self) -> bool {
        matches!(
            self,
            Error::IllegalConnection { .. }
                | Error::PortSaturated { .. }
                | Error::SelfLoop(_)
                | Error::PolarityMismatch { .. }
        )
    }
}
