// Copyright 2026 Dropbox (created by Andrew Yates <ayates@dropbox.com>)

//! Graph Store
//!
//! [`DialogueGraph`] owns the canonical node and link collections and is the
//! single source of truth for an editing session. Every mutation command
//! validates against the node schema and the connection policy before
//! touching state; a rejected command leaves the graph exactly as it was.
//!
//! The store is single-threaded by design: one editing session is the only
//! logical mutator, so there is no interior locking. Readers that must not
//! observe mutation (the compiler, the codec) work on an owned
//! [`crate::snapshot::GraphSnapshot`] instead of borrowing the store.

use crate::error::{Error, Result};
use crate::kind::{branch_port_name, NodeKind, PortPolarity};
use crate::node::{Node, NodeData, NodeId};
use crate::policy;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Link identifier. Opaque, unique for the lifetime of a session, never reused.
pub type LinkId = Uuid;

/// One endpoint of a link: a node and one of its ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkEnd {
    /// Referenced node.
    pub node: NodeId,
    /// Port on that node.
    pub port: String,
}

impl LinkEnd {
    /// Endpoint for `port` on `node`.
    pub fn new(node: NodeId, port: impl Into<String>) -> Self {
        Self {
            node,
            port: port.into(),
        }
    }
}

/// A directed link from an active port to a passive port.
///
/// The target may be absent: a dangling link is a first-class legal state in
/// the editable graph and compiles to an explicit `null` next-pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Unique id.
    pub id: LinkId,
    /// Source endpoint; always an output port.
    pub source: LinkEnd,
    /// Target endpoint; always an input port when present.
    pub target: Option<LinkEnd>,
}

/// The mutable node/link store backing one editing session.
#[derive(Debug, Clone, Default)]
pub struct DialogueGraph {
    pub(crate) nodes: IndexMap<NodeId, Node>,
    pub(crate) links: IndexMap<LinkId, Link>,
}

impl DialogueGraph {
    /// Empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Node by id.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Link by id.
    pub fn link(&self, id: LinkId) -> Option<&Link> {
        self.links.get(&id)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Links in insertion order.
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.links.values()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of links.
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// True when the graph holds no nodes and no links.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty()
    }

    /// All links whose source is `port` on `node`, in insertion order.
    pub fn links_from_port(&self, node: NodeId, port: &str) -> Vec<&Link> {
        self.links
            .values()
            .filter(|link| link.source.node == node && link.source.port == port)
            .collect()
    }

    // ------------------------------------------------------------------
    // Node commands
    // ------------------------------------------------------------------

    /// Create a node of `kind` with default fields and initial ports.
    pub fn add_node(&mut self, kind: NodeKind) -> NodeId {
        let node = Node::new(kind);
        let id = node.id;
        tracing::debug!(node = %id, kind = %kind, "added node");
        self.nodes.insert(id, node);
        id
    }

    /// Create a node of `kind` and apply initial field values.
    ///
    /// All-or-nothing: an invalid field removes the half-created node and
    /// returns the error.
    pub fn add_node_with_fields<'a, I>(&mut self, kind: NodeKind, fields: I) -> Result<NodeId>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let id = self.add_node(kind);
        for (field, value) in fields {
            if let Err(err) = self.set_field(id, field, value) {
                self.remove_node(id);
                return Err(err);
            }
        }
        Ok(id)
    }

    /// Remove a node and every link incident to it. No-op on an unknown id.
    pub fn remove_node(&mut self, id: NodeId) {
        if self.nodes.shift_remove(&id).is_none() {
            return;
        }
        self.links.retain(|_, link| {
            link.source.node != id && link.target.as_ref().map_or(true, |end| end.node != id)
        });
        tracing::debug!(node = %id, "removed node and incident links");
    }

    /// Clone a node's kind, fields and ports under a fresh id.
    ///
    /// The copy starts unlinked regardless of the original's links.
    pub fn duplicate_node(&mut self, id: NodeId) -> Result<NodeId> {
        let node = self.nodes.get(&id).ok_or(Error::UnknownNode(id))?;
        let copy = node.duplicate();
        let copy_id = copy.id;
        self.nodes.insert(copy_id, copy);
        Ok(copy_id)
    }

    /// Set a schema field on a node.
    ///
    /// Unknown node ids are hard failures; a field outside the kind's
    /// schema is [`Error::InvalidField`].
    pub fn set_field(&mut self, id: NodeId, field: &str, value: impl Into<String>) -> Result<()> {
        let node = self.nodes.get_mut(&id).ok_or(Error::UnknownNode(id))?;
        let slot = match (&mut node.data, field) {
            (NodeData::Speech { actor, .. }, "actor") => actor,
            (NodeData::Speech { name, .. }, "name") => name,
            (NodeData::Choice { title, .. }, "title") => title,
            (NodeData::Choice { name, .. }, "name") => name,
            (NodeData::Set { variable, .. }, "variable") => variable,
            (NodeData::Set { value, .. }, "value") => value,
            (NodeData::Branch { variable, .. }, "variable") => variable,
            _ => {
                return Err(Error::InvalidField {
                    kind: node.kind,
                    field: field.to_string(),
                })
            }
        };
        *slot = value.into();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Branch port commands
    // ------------------------------------------------------------------

    /// Append an output port to a Branch, bound to `value`.
    ///
    /// Maintains `values.len() == out_ports.len() - 1`.
    pub fn add_output_port(&mut self, id: NodeId, value: impl Into<String>) -> Result<()> {
        let node = self.nodes.get_mut(&id).ok_or(Error::UnknownNode(id))?;
        let NodeData::Branch { values, .. } = &mut node.data else {
            return Err(Error::InvalidField {
                kind: node.kind,
                field: "values".to_string(),
            });
        };
        node.out_ports.push(branch_port_name(node.out_ports.len()));
        values.push(value.into());
        Ok(())
    }

    /// Drop a Branch's last output port and its bound value.
    ///
    /// No-op when only the default port remains. Links sourced at the
    /// removed port are deleted with it.
    pub fn remove_last_output_port(&mut self, id: NodeId) -> Result<()> {
        let node = self.nodes.get_mut(&id).ok_or(Error::UnknownNode(id))?;
        let NodeData::Branch { values, .. } = &mut node.data else {
            return Err(Error::InvalidField {
                kind: node.kind,
                field: "values".to_string(),
            });
        };
        if node.out_ports.len() <= 1 {
            return Ok(());
        }
        let Some(removed) = node.out_ports.pop() else {
            return Ok(());
        };
        values.pop();
        self.links
            .retain(|_, link| !(link.source.node == id && link.source.port == removed));
        Ok(())
    }

    /// Rebind the match value of an existing Branch output port.
    ///
    /// `index` counts into the values list (value `i` belongs to port
    /// `i + 1`); out of range is [`Error::InvalidField`].
    pub fn set_branch_value(
        &mut self,
        id: NodeId,
        index: usize,
        value: impl Into<String>,
    ) -> Result<()> {
        let node = self.nodes.get_mut(&id).ok_or(Error::UnknownNode(id))?;
        let kind = node.kind;
        let slot = match &mut node.data {
            NodeData::Branch { values, .. } => values.get_mut(index),
            _ => None,
        };
        match slot {
            Some(slot) => {
                *slot = value.into();
                Ok(())
            }
            None => Err(Error::InvalidField {
                kind,
                field: format!("values[{index}]"),
            }),
        }
    }

    // ------------------------------------------------------------------
    // Link commands
    // ------------------------------------------------------------------

    /// Create a link from an output port to an input port.
    ///
    /// Validates, in order: node existence, source and target polarity,
    /// non-self-loop, adjacency, port capacity. The first failing check
    /// returns its named error and the graph is left untouched.
    pub fn add_link(
        &mut self,
        source: NodeId,
        source_port: impl Into<String>,
        target: NodeId,
        target_port: impl Into<String>,
    ) -> Result<LinkId> {
        let source_port = source_port.into();
        let target_port = target_port.into();

        let source_node = self.nodes.get(&source).ok_or(Error::UnknownNode(source))?;
        let target_node = self.nodes.get(&target).ok_or(Error::UnknownNode(target))?;

        if source_node.port_polarity(&source_port) != Some(PortPolarity::Active) {
            return Err(Error::PolarityMismatch {
                node: source,
                port: source_port,
                expected: PortPolarity::Active,
            });
        }
        if target_node.port_polarity(&target_port) != Some(PortPolarity::Passive) {
            return Err(Error::PolarityMismatch {
                node: target,
                port: target_port,
                expected: PortPolarity::Passive,
            });
        }
        if source == target {
            return Err(Error::SelfLoop(source));
        }
        if !policy::can_connect(source_node.kind, target_node.kind) {
            return Err(Error::IllegalConnection {
                source_kind: source_node.kind,
                target: target_node.kind,
            });
        }
        if !policy::port_has_capacity(self, source, &source_port, target_node.kind) {
            return Err(Error::PortSaturated {
                node: source,
                port: source_port,
            });
        }

        Ok(self.insert_link(
            LinkEnd::new(source, source_port),
            Some(LinkEnd::new(target, target_port)),
        ))
    }

    /// Create a link with no target yet.
    ///
    /// The editor produces these while a connection is being dragged or
    /// when the user drops a link on empty canvas; they compile to a `null`
    /// next-pointer. Only polarity and capacity apply; the fanout exception
    /// never does, because a dangling link has no Choice target.
    pub fn add_dangling_link(
        &mut self,
        source: NodeId,
        source_port: impl Into<String>,
    ) -> Result<LinkId> {
        let source_port = source_port.into();
        let source_node = self.nodes.get(&source).ok_or(Error::UnknownNode(source))?;

        if source_node.port_polarity(&source_port) != Some(PortPolarity::Active) {
            return Err(Error::PolarityMismatch {
                node: source,
                port: source_port,
                expected: PortPolarity::Active,
            });
        }
        if !self.links_from_port(source, &source_port).is_empty() {
            return Err(Error::PortSaturated {
                node: source,
                port: source_port,
            });
        }

        Ok(self.insert_link(LinkEnd::new(source, source_port), None))
    }

    fn insert_link(&mut self, source: LinkEnd, target: Option<LinkEnd>) -> LinkId {
        let id = Uuid::new_v4();
        tracing::debug!(
            link = %id,
            source = %source.node,
            port = %source.port,
            target = ?target.as_ref().map(|end| end.node),
            "added link"
        );
        self.links.insert(id, Link { id, source, target });
        id
    }

    /// Remove a link. No-op on an unknown id.
    pub fn remove_link(&mut self, id: LinkId) {
        if self.links.shift_remove(&id).is_some() {
            tracing::debug!(link = %id, "removed link");
        }
    }

    /// Remove all nodes and links.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.links.clear();
        tracing::debug!("cleared graph");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::NodeKind::*;

    #[test]
    fn test_add_node_assigns_unique_ids() {
        let mut graph = DialogueGraph::new();
        let a = graph.add_node(Text);
        let b = graph.add_node(Text);
        assert_ne!(a, b);
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn test_add_node_with_fields() {
        let mut graph = DialogueGraph::new();
        let id = graph
            .add_node_with_fields(Choice, [("title", "Go left"), ("name", "I went left.")])
            .unwrap();
        let node = graph.node(id).unwrap();
        assert_eq!(
            node.data,
            NodeData::Choice {
                title: "Go left".to_string(),
                name: "I went left.".to_string(),
            }
        );
    }

    #[test]
    fn test_add_node_with_fields_is_atomic() {
        let mut graph = DialogueGraph::new();
        let result = graph.add_node_with_fields(Set, [("variable", "met_taylor"), ("title", "x")]);
        assert!(matches!(result, Err(Error::InvalidField { .. })));
        assert_eq!(graph.node_count(), 0);
    }

    #[test]
    fn test_set_field_unknown_node() {
        let mut graph = DialogueGraph::new();
        let result = graph.set_field(Uuid::new_v4(), "name", "hi");
        assert!(matches!(result, Err(Error::UnknownNode(_))));
    }

    #[test]
    fn test_set_field_rejects_foreign_field() {
        let mut graph = DialogueGraph::new();
        let set = graph.add_node(Set);
        let result = graph.set_field(set, "actor", "Taylor");
        assert!(matches!(
            result,
            Err(Error::InvalidField { kind: Set, .. })
        ));
    }

    #[test]
    fn test_remove_node_is_idempotent() {
        let mut graph = DialogueGraph::new();
        let id = graph.add_node(Text);
        graph.remove_node(id);
        graph.remove_node(id);
        assert!(graph.is_empty());
    }

    #[test]
    fn test_remove_node_cascades_links() {
        let mut graph = DialogueGraph::new();
        let a = graph.add_node(Text);
        let b = graph.add_node(Node);
        let c = graph.add_node(Set);
        graph.add_link(a, "output", b, "input").unwrap();
        graph.add_link(b, "output", c, "input").unwrap();

        graph.remove_node(b);
        assert_eq!(graph.link_count(), 0);
        assert!(graph
            .links()
            .all(|link| link.source.node != b && link.target.as_ref().map_or(true, |t| t.node != b)));
    }

    #[test]
    fn test_duplicate_node_copies_no_links() {
        let mut graph = DialogueGraph::new();
        let a = graph.add_node(Text);
        let b = graph.add_node(Node);
        graph.set_field(a, "name", "Hello there.").unwrap();
        graph.add_link(a, "output", b, "input").unwrap();

        let copy = graph.duplicate_node(a).unwrap();
        assert_eq!(graph.node(copy).unwrap().data, graph.node(a).unwrap().data);
        assert!(graph.links_from_port(copy, "output").is_empty());
        assert_eq!(graph.link_count(), 1);
    }

    #[test]
    fn test_duplicate_unknown_node() {
        let mut graph = DialogueGraph::new();
        assert!(matches!(
            graph.duplicate_node(Uuid::new_v4()),
            Err(Error::UnknownNode(_))
        ));
    }

    #[test]
    fn test_branch_port_growth() {
        let mut graph = DialogueGraph::new();
        let branch = graph.add_node(Branch);
        graph.add_output_port(branch, "yes").unwrap();
        graph.add_output_port(branch, "no").unwrap();

        let node = graph.node(branch).unwrap();
        assert_eq!(node.out_ports, vec!["output0", "output1", "output2"]);
        assert_eq!(node.values().unwrap(), &["yes", "no"]);
    }

    #[test]
    fn test_branch_port_removal_drops_links() {
        let mut graph = DialogueGraph::new();
        let branch = graph.add_node(Branch);
        let target = graph.add_node(Set);
        graph.add_output_port(branch, "yes").unwrap();
        graph.add_link(branch, "output1", target, "input").unwrap();

        graph.remove_last_output_port(branch).unwrap();
        assert_eq!(graph.link_count(), 0);
        let node = graph.node(branch).unwrap();
        assert_eq!(node.out_ports, vec!["output0"]);
        assert!(node.values().unwrap().is_empty());
    }

    #[test]
    fn test_branch_default_port_cannot_be_removed() {
        let mut graph = DialogueGraph::new();
        let branch = graph.add_node(Branch);
        graph.remove_last_output_port(branch).unwrap();
        graph.remove_last_output_port(branch).unwrap();
        assert_eq!(graph.node(branch).unwrap().out_ports, vec!["output0"]);
    }

    #[test]
    fn test_port_ops_reject_non_branch() {
        let mut graph = DialogueGraph::new();
        let text = graph.add_node(Text);
        assert!(matches!(
            graph.add_output_port(text, "x"),
            Err(Error::InvalidField { kind: Text, .. })
        ));
        assert!(matches!(
            graph.remove_last_output_port(text),
            Err(Error::InvalidField { .. })
        ));
    }

    #[test]
    fn test_set_branch_value() {
        let mut graph = DialogueGraph::new();
        let branch = graph.add_node(Branch);
        graph.add_output_port(branch, "").unwrap();
        graph.set_branch_value(branch, 0, "maybe").unwrap();
        assert_eq!(graph.node(branch).unwrap().values().unwrap(), &["maybe"]);

        assert!(matches!(
            graph.set_branch_value(branch, 1, "nope"),
            Err(Error::InvalidField { .. })
        ));
    }

    #[test]
    fn test_add_link_validates_in_order() {
        let mut graph = DialogueGraph::new();
        let a = graph.add_node(Text);
        let b = graph.add_node(Set);

        // polarity before self-loop: bad source port on a self-link
        assert!(matches!(
            graph.add_link(a, "input", a, "input"),
            Err(Error::PolarityMismatch { .. })
        ));
        // self-loop before adjacency
        assert!(matches!(
            graph.add_link(a, "output", a, "input"),
            Err(Error::SelfLoop(_))
        ));
        // wrong-polarity target
        assert!(matches!(
            graph.add_link(a, "output", b, "output"),
            Err(Error::PolarityMismatch { .. })
        ));
        assert_eq!(graph.link_count(), 0);
    }

    #[test]
    fn test_add_link_rejects_illegal_connection() {
        let mut graph = DialogueGraph::new();
        let set = graph.add_node(Set);
        let choice = graph.add_node(Choice);
        assert!(matches!(
            graph.add_link(set, "output", choice, "input"),
            Err(Error::IllegalConnection {
                source_kind: Set,
                target: Choice,
            })
        ));
        assert_eq!(graph.link_count(), 0);
    }

    #[test]
    fn test_add_link_saturation() {
        let mut graph = DialogueGraph::new();
        let text = graph.add_node(Text);
        let first = graph.add_node(Node);
        let second = graph.add_node(Node);
        graph.add_link(text, "output", first, "input").unwrap();

        assert!(matches!(
            graph.add_link(text, "output", second, "input"),
            Err(Error::PortSaturated { .. })
        ));
        assert_eq!(graph.link_count(), 1);
    }

    #[test]
    fn test_add_link_choice_fanout() {
        let mut graph = DialogueGraph::new();
        let text = graph.add_node(Text);
        let left = graph.add_node(Choice);
        let right = graph.add_node(Choice);
        let strict = graph.add_node(Node);

        graph.add_link(text, "output", left, "input").unwrap();
        graph.add_link(text, "output", right, "input").unwrap();
        assert_eq!(graph.link_count(), 2);

        // the exception is per-target-kind: a Node target is still refused
        assert!(matches!(
            graph.add_link(text, "output", strict, "input"),
            Err(Error::PortSaturated { .. })
        ));
    }

    #[test]
    fn test_add_link_into_starting_text_is_polarity_error() {
        let mut graph = DialogueGraph::new();
        let text = graph.add_node(Text);
        let start = graph.add_node(StartingText);
        // StartingText has no input port
        assert!(matches!(
            graph.add_link(text, "output", start, "input"),
            Err(Error::PolarityMismatch { .. })
        ));
    }

    #[test]
    fn test_dangling_link_occupies_port() {
        let mut graph = DialogueGraph::new();
        let text = graph.add_node(Text);
        let choice = graph.add_node(Choice);
        graph.add_dangling_link(text, "output").unwrap();

        assert!(matches!(
            graph.add_link(text, "output", choice, "input"),
            Err(Error::PortSaturated { .. })
        ));
        assert!(matches!(
            graph.add_dangling_link(text, "output"),
            Err(Error::PortSaturated { .. })
        ));
    }

    #[test]
    fn test_remove_link_is_idempotent() {
        let mut graph = DialogueGraph::new();
        let a = graph.add_node(Text);
        let b = graph.add_node(Node);
        let link = graph.add_link(a, "output", b, "input").unwrap();
        graph.remove_link(link);
        graph.remove_link(link);
        assert_eq!(graph.link_count(), 0);
    }

    #[test]
    fn test_clear() {
        let mut graph = DialogueGraph::new();
        let a = graph.add_node(Text);
        let b = graph.add_node(Node);
        graph.add_link(a, "output", b, "input").unwrap();
        graph.clear();
        assert!(graph.is_empty());
    }
}
