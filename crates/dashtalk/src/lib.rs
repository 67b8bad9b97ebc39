// Copyright 2026 Dropbox (created by Andrew Yates <ayates@dropbox.com>)

//! Dialogue graph editor core for `DashTalk`.
//!
//! This crate is the graph model and compilation engine behind a visual
//! dialogue-tree editor: the editor UI places typed nodes, connects them
//! with directional links and edits per-node fields, while this core owns
//! the graph, enforces connection legality and port capacity on every
//! mutation, and flattens the graph into the script a dialogue playback
//! engine consumes.
//!
//! # Features
//!
//! - Six node kinds (`StartingText`, `Text`, `Node`, `Choice`, `Set`,
//!   `Branch`) with per-kind field schemas and port shapes
//! - Mutation-time invariant enforcement: adjacency rules, port capacity
//!   with the choice-fanout exception, polarity, no self-loops
//! - Dynamic Branch ports, one per configured match value plus a default
//! - Two-pass compilation to flat `next` / `choices` / `branches` script
//!   nodes, with dangling links degrading to explicit `null`
//! - Lossless snapshot codec for persistence by the embedding editor
//!
//! # Example
//!
//! ```rust
//! use dashtalk::{compile, DialogueGraph, NodeKind};
//!
//! let mut graph = DialogueGraph::new();
//! let start = graph.add_node(NodeKind::StartingText);
//! let left = graph.add_node(NodeKind::Choice);
//! let right = graph.add_node(NodeKind::Choice);
//! graph.set_field(start, "name", "Which way?")?;
//! graph.set_field(left, "title", "Go left")?;
//! graph.set_field(right, "title", "Go right")?;
//! graph.add_link(start, "output", left, "input")?;
//! graph.add_link(start, "output", right, "input")?;
//!
//! let script = compile(&graph.snapshot());
//! assert_eq!(script[0].choices.as_ref().map(Vec::len), Some(2));
//! # Ok::<(), dashtalk::Error>(())
//! ```
//!
//! # See Also
//!
//! - [`DialogueGraph`] - the mutable store and its command surface
//! - [`compile`] - graph snapshot to runtime script
//! - [`GraphSnapshot`] - the persistence-facing representation

pub mod actor;
pub mod compile;
pub mod error;
pub mod graph;
pub mod kind;
pub mod node;
pub mod policy;
pub mod snapshot;

pub use actor::{Actor, ActorRoster};
pub use compile::{compile, compile_to_json, ScriptNode, DEFAULT_BRANCH};
pub use error::{Error, Result};
pub use graph::{DialogueGraph, Link, LinkEnd, LinkId};
pub use kind::{NodeKind, PortPolarity, INPUT_PORT, OUTPUT_PORT};
pub use node::{Node, NodeData, NodeId};
pub use policy::{can_connect, port_has_capacity};
pub use snapshot::GraphSnapshot;
