// Copyright 2026 Dropbox (created by Andrew Yates <ayates@dropbox.com>)

//! Connection Policy
//!
//! Pure rules answering "may kind A's output connect to kind B's input" and
//! "does this output port still have capacity". The graph store consults
//! them before committing a link; the editor UI consults them to drive
//! connection feedback while a link is being dragged.

use crate::graph::DialogueGraph;
use crate::kind::NodeKind;
use crate::node::NodeId;

/// Adjacency rule: every kind may target every kind, except that only
/// `StartingText`, `Text` and `Node` outputs may target a `Choice`.
pub fn can_connect(source: NodeKind, target: NodeKind) -> bool {
    match target {
        NodeKind::Choice => matches!(
            source,
            NodeKind::StartingText | NodeKind::Text | NodeKind::Node
        ),
        _ => true,
    }
}

/// Capacity rule for an output port.
///
/// True when the port has no outgoing link yet, or when the unlimited
/// choice-fanout exception applies: the source kind carries the flag, every
/// existing link from the port already targets a `Choice`, and the
/// candidate target is also a `Choice`. A dangling existing link has no
/// target kind and therefore blocks the exception.
///
/// Returns false for an unknown source node; existence is the store's
/// concern and reported there as a named error.
pub fn port_has_capacity(
    graph: &DialogueGraph,
    source: NodeId,
    source_port: &str,
    candidate_target: NodeKind,
) -> bool {
    let Some(node) = graph.node(source) else {
        return false;
    };
    let existing = graph.links_from_port(source, source_port);
    if existing.is_empty() {
        return true;
    }
    if !node.kind.unlimited_choice_fanout() || candidate_target != NodeKind::Choice {
        return false;
    }
    existing.iter().all(|link| {
        link.target
            .as_ref()
            .and_then(|end| graph.node(end.node))
            .is_some_and(|target| target.kind == NodeKind::Choice)
    })
}
