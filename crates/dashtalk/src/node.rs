// Copyright 2026 Dropbox (created by Andrew Yates <ayates@dropbox.com>)

//! Node model
//!
//! A [`Node`] pairs its [`NodeKind`] tag with kind-specific [`NodeData`] and
//! an ordered output-port list. Data is an enum dispatched on the tag; the
//! three `Text`-family kinds share the [`NodeData::Speech`] shape.

use crate::kind::{NodeKind, PortPolarity, INPUT_PORT};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Node identifier. Opaque, unique for the lifetime of a session, never reused.
pub type NodeId = Uuid;

/// Kind-specific node fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeData {
    /// `StartingText`, `Text` and `Node`: a spoken line.
    Speech {
        /// Actor name this line is attributed to. Stored as the plain
        /// roster name; an unknown reference is a UI concern, not a graph
        /// invariant.
        actor: String,
        /// The speech text.
        name: String,
    },
    /// `Choice`: a selectable option.
    Choice {
        /// Short label shown on the choice button.
        title: String,
        /// Speech text spoken when the choice is taken.
        name: String,
    },
    /// `Set`: a variable assignment.
    Set {
        /// Variable to assign.
        variable: String,
        /// Value to assign.
        value: String,
    },
    /// `Branch`: routing on a variable.
    Branch {
        /// Variable whose value selects the branch.
        variable: String,
        /// Match values; entry `i` belongs to output port `i + 1`.
        /// Port 0 is the implicit default and has no entry here.
        values: Vec<String>,
    },
}

impl NodeData {
    /// Default data for a kind, mirroring the editor's fresh-node state.
    pub fn default_for(kind: NodeKind) -> Self {
        match kind {
            NodeKind::StartingText | NodeKind::Text | NodeKind::Node => NodeData::Speech {
                actor: String::new(),
                name: String::new(),
            },
            NodeKind::Choice => NodeData::Choice {
                title: String::new(),
                name: String::new(),
            },
            NodeKind::Set => NodeData::Set {
                variable: String::new(),
                value: String::new(),
            },
            NodeKind::Branch => NodeData::Branch {
                variable: String::new(),
                values: Vec::new(),
            },
        }
    }
}

/// A dialogue node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Unique id.
    pub id: NodeId,
    /// Kind tag; fixed for the node's lifetime.
    pub kind: NodeKind,
    /// Kind-specific fields. The variant always agrees with `kind`.
    pub data: NodeData,
    /// Ordered active ports. Mutable only for `Branch`.
    pub out_ports: Vec<String>,
}

impl Node {
    /// Fresh node of `kind` with default field values and initial ports.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            data: NodeData::default_for(kind),
            out_ports: kind.initial_out_ports(),
        }
    }

    /// Exact polarity of `port` on this node.
    ///
    /// Unlike [`NodeKind::port_polarity`] this checks Branch ports against
    /// the node's current port list, so `output3` on a two-port Branch is
    /// `None`.
    pub fn port_polarity(&self, port: &str) -> Option<PortPolarity> {
        if port == INPUT_PORT {
            return (self.kind.input_capacity() > 0).then_some(PortPolarity::Passive);
        }
        self.out_ports
            .iter()
            .any(|p| p == port)
            .then_some(PortPolarity::Active)
    }

    /// Branch match values, if this is a Branch node.
    pub fn values(&self) -> Option<&[String]> {
        match &self.data {
            NodeData::Branch { values, .. } => Some(values),
            _ => None,
        }
    }

    /// Copy of this node under a fresh id. Links are not copied; they
    /// belong to the graph.
    pub(crate) fn duplicate(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: self.kind,
            data: self.data.clone(),
            out_ports: self.out_ports.clone(),
        }
    }
}
