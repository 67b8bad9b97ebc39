// Copyright 2026 Dropbox (created by Andrew Yates <ayates@dropbox.com>)

//! Compiler - graph snapshot to runtime dialogue script
//!
//! Flattens a [`GraphSnapshot`] into the list of [`ScriptNode`]s a dialogue
//! playback engine consumes. All port-level indirection is resolved into
//! plain `next` pointers, ordered `choices` lists, or `branches` maps.
//!
//! The compiler assumes the store already enforced the structural
//! invariants and does not re-validate. States that are permitted but odd
//! (dangling links, empty Branch value lists) degrade to explicit `null`
//! references rather than errors; only a link whose SOURCE node is missing
//! is treated as stale and skipped with a warning.

use crate::kind::{branch_port_index, NodeKind};
use crate::node::{Node, NodeData, NodeId};
use crate::snapshot::GraphSnapshot;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Key of a Branch's default arm in the compiled `branches` map.
pub const DEFAULT_BRANCH: &str = "_default";

/// One flattened node of the compiled dialogue script.
///
/// Serializes to exactly
/// `{type, id, actor?, name?, title?, next?, choices?, variable?, value?, branches?}`
/// with optional fields present only for the relevant kinds. `next` is an
/// explicit `null` until resolved, and disappears entirely once a node
/// accumulates `choices` (a node has `next` XOR `choices`, never both).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptNode {
    /// Kind name, e.g. `"StartingText"`.
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Id of the graph node this was compiled from.
    pub id: NodeId,
    /// Speaking actor (`StartingText`/`Text`/`Node`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    /// Speech text (`StartingText`/`Text`/`Node`/`Choice`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Choice button label (`Choice`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Resolved successor. Outer `None` means the field is absent (Branch
    /// nodes, and choice-fanout sources); inner `None` is an explicit
    /// `null` next-pointer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<Option<NodeId>>,
    /// Ordered choice targets, replacing `next` on fanout sources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<NodeId>>,
    /// Dialogue variable (`Set`/`Branch`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable: Option<String>,
    /// Assigned value (`Set`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Branch arms: match value (or [`DEFAULT_BRANCH`]) to target id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branches: Option<IndexMap<String, Option<NodeId>>>,
}

impl ScriptNode {
    /// First-pass emission: kind-specific fields, unresolved references.
    fn emit(node: &Node) -> Self {
        let mut script = ScriptNode {
            kind: node.kind,
            id: node.id,
            actor: None,
            name: None,
            title: None,
            next: None,
            choices: None,
            variable: None,
            value: None,
            branches: None,
        };
        match &node.data {
            NodeData::Speech { actor, name } => {
                script.actor = Some(actor.clone());
                script.name = Some(name.clone());
                script.next = Some(None);
            }
            NodeData::Choice { title, name } => {
                script.title = Some(title.clone());
                script.name = Some(name.clone());
                script.next = Some(None);
            }
            NodeData::Set { variable, value } => {
                script.variable = Some(variable.clone());
                script.value = Some(value.clone());
                script.next = Some(None);
            }
            NodeData::Branch { variable, values } => {
                script.variable = Some(variable.clone());
                let mut branches = IndexMap::with_capacity(values.len() + 1);
                branches.insert(DEFAULT_BRANCH.to_string(), None);
                for value in values {
                    branches.insert(value.clone(), None);
                }
                script.branches = Some(branches);
            }
        }
        script
    }
}

/// Compile a snapshot into the flattened dialogue script.
///
/// Output order is the snapshot's node order; stable but not semantically
/// significant.
pub fn compile(snapshot: &GraphSnapshot) -> Vec<ScriptNode> {
    let mut index_of: HashMap<NodeId, usize> = HashMap::with_capacity(snapshot.nodes.len());
    let mut script: Vec<ScriptNode> = Vec::with_capacity(snapshot.nodes.len());

    for node in &snapshot.nodes {
        index_of.insert(node.id, script.len());
        script.push(ScriptNode::emit(node));
    }

    for link in &snapshot.links {
        let Some(&source) = index_of.get(&link.source.node) else {
            tracing::warn!(
                link = %link.id,
                source = %link.source.node,
                "skipping stale link with unknown source"
            );
            continue;
        };
        // an unknown target id degrades to null, same as an absent target
        let target = link
            .target
            .as_ref()
            .map(|end| end.node)
            .filter(|id| index_of.contains_key(id));
        let target_kind = target.map(|id| snapshot.nodes[index_of[&id]].kind);
        let source_node = &snapshot.nodes[source];

        match source_node.kind {
            NodeKind::Branch => {
                let key = match branch_port_index(&link.source.port) {
                    Some(0) => DEFAULT_BRANCH.to_string(),
                    Some(index) => {
                        match source_node.values().and_then(|values| values.get(index - 1)) {
                            Some(value) => value.clone(),
                            None => {
                                tracing::warn!(
                                    link = %link.id,
                                    port = %link.source.port,
                                    "skipping Branch link outside the recorded values"
                                );
                                continue;
                            }
                        }
                    }
                    None => {
                        tracing::warn!(
                            link = %link.id,
                            port = %link.source.port,
                            "skipping Branch link with malformed port id"
                        );
                        continue;
                    }
                };
                if let Some(branches) = &mut script[source].branches {
                    branches.insert(key, target);
                }
            }
            _ if source_node.kind.unlimited_choice_fanout()
                && target_kind == Some(NodeKind::Choice) =>
            {
                if let Some(target) = target {
                    let entry = &mut script[source];
                    entry.next = None;
                    entry.choices.get_or_insert_with(Vec::new).push(target);
                }
            }
            _ => {
                script[source].next = Some(target);
            }
        }
    }

    script
}

/// Compile straight to the JSON artifact a playback engine loads.
///
/// # Errors
///
/// Returns [`crate::Error::Serialization`] if encoding fails.
pub fn compile_to_json(snapshot: &GraphSnapshot) -> crate::Result<String> {
    Ok(serde_json::to_string_pretty(&compile(snapshot))?)
}
