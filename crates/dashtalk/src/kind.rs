// Copyright 2026 Dropbox (created by Andrew Yates <ayates@dropbox.com>)

//! Node Registry - the per-kind schema table
//!
//! [`NodeKind`] is the tag distinguishing the six dialogue node kinds. All
//! per-kind knowledge (input capacity, initial output ports, field schema,
//! the unlimited-fanout exception) lives here as inherent methods, so the
//! rest of the crate dispatches on the tag instead of on type hierarchies.
//!
//! The registry is immutable and freely shared; every method is a pure
//! lookup.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the single passive (input) port carried by every kind except
/// `StartingText`.
pub const INPUT_PORT: &str = "input";

/// Name of the single active (output) port on non-Branch kinds.
pub const OUTPUT_PORT: &str = "output";

/// Prefix of Branch output ports: `output0` (default), `output1`, ...
pub const BRANCH_PORT_PREFIX: &str = "output";

/// The kind tag of a dialogue node.
///
/// Variant names serialize exactly as the `type` strings the compiled
/// script and the editable snapshot use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Entry line of a dialogue; no input port.
    StartingText,
    /// A spoken line attributed to an actor.
    Text,
    /// A generic passthrough node.
    Node,
    /// A player-selectable choice.
    Choice,
    /// Assigns a value to a dialogue variable.
    Set,
    /// Routes on a dialogue variable's value; dynamic output ports.
    Branch,
}

impl NodeKind {
    /// All kinds, in the editor's menu order.
    pub const ALL: [NodeKind; 6] = [
        NodeKind::StartingText,
        NodeKind::Text,
        NodeKind::Node,
        NodeKind::Choice,
        NodeKind::Set,
        NodeKind::Branch,
    ];

    /// Display name, identical to the serialized `type` string.
    pub fn display_name(&self) -> &'static str {
        match self {
            NodeKind::StartingText => "StartingText",
            NodeKind::Text => "Text",
            NodeKind::Node => "Node",
            NodeKind::Choice => "Choice",
            NodeKind::Set => "Set",
            NodeKind::Branch => "Branch",
        }
    }

    /// Number of incoming links the kind's input side accepts: 0 for
    /// `StartingText`, 1 for everything else.
    pub fn input_capacity(&self) -> usize {
        match self {
            NodeKind::StartingText => 0,
            _ => 1,
        }
    }

    /// Output ports a fresh node of this kind starts with.
    ///
    /// Fixed for every kind except `Branch`, whose port list grows and
    /// shrinks with its configured values (port 0 is the implicit default).
    pub fn initial_out_ports(&self) -> Vec<String> {
        match self {
            NodeKind::Branch => vec![format!("{BRANCH_PORT_PREFIX}0")],
            _ => vec![OUTPUT_PORT.to_string()],
        }
    }

    /// True for the kinds whose output port may fan out into multiple
    /// links, provided every target is a `Choice`.
    ///
    /// The only exception to the one-link-per-output-port rule; the compile
    /// step's `next`-vs-`choices` duality depends on exactly this set.
    pub fn unlimited_choice_fanout(&self) -> bool {
        matches!(
            self,
            NodeKind::StartingText | NodeKind::Text | NodeKind::Node
        )
    }

    /// The settable field names of the kind's schema.
    ///
    /// `Branch` values are not listed: they are managed through the port
    /// operations so the values-to-ports invariant stays local to them.
    pub fn field_names(&self) -> &'static [&'static str] {
        match self {
            NodeKind::StartingText | NodeKind::Text | NodeKind::Node => &["actor", "name"],
            NodeKind::Choice => &["title", "name"],
            NodeKind::Set => &["variable", "value"],
            NodeKind::Branch => &["variable"],
        }
    }

    /// True if `field` is part of this kind's settable schema.
    pub fn has_field(&self, field: &str) -> bool {
        self.field_names().contains(&field)
    }

    /// Shape-level polarity of a port id on this kind.
    ///
    /// Answers from the kind's port naming scheme alone; for `Branch` any
    /// well-formed `outputN` id is active regardless of the node's current
    /// port count. Use [`crate::node::Node::port_polarity`] for the exact
    /// per-node answer.
    pub fn port_polarity(&self, port: &str) -> Option<PortPolarity> {
        if port == INPUT_PORT {
            return (self.input_capacity() > 0).then_some(PortPolarity::Passive);
        }
        match self {
            NodeKind::Branch => branch_port_index(port).map(|_| PortPolarity::Active),
            _ => (port == OUTPUT_PORT).then_some(PortPolarity::Active),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Whether a port acts as a link source (active) or link target (passive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortPolarity {
    /// Output side; links originate here.
    Active,
    /// Input side; links terminate here.
    Passive,
}

impl fmt::Display for PortPolarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortPolarity::Active => f.write_str("active (source)"),
            PortPolarity::Passive => f.write_str("passive (target)"),
        }
    }
}

/// Decode the index of a Branch output port id (`output0` -> 0).
///
/// Returns `None` for the bare `output` port of non-Branch kinds and for
/// anything else that is not `output<digits>`.
pub fn branch_port_index(port: &str) -> Option<usize> {
    let digits = port.strip_prefix(BRANCH_PORT_PREFIX)?;
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Port id of the Branch output at `index` (0 is the default port).
pub fn branch_port_name(index: usize) -> String {
    format!("{BRANCH_PORT_PREFIX}{index}")
}
