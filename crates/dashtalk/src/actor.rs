//! Actor roster
//!
//! The editable list of speaking actors the `actor` field of a speech node
//! refers to. The graph stores the actor NAME as a plain string (that is
//! what the compiled script carries), so the roster is a lookup aid for the
//! editor's actor picker, not a graph invariant: removing an actor never
//! invalidates existing nodes.

use serde::{Deserialize, Serialize};

/// One speaking actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Stable id within the roster.
    pub id: u32,
    /// Display name, referenced by speech nodes.
    pub name: String,
}

/// Ordered actor list with id and name lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorRoster {
    actors: Vec<Actor>,
    next_id: u32,
}

impl ActorRoster {
    /// Empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an actor and return its id.
    pub fn add(&mut self, name: impl Into<String>) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.actors.push(Actor {
            id,
            name: name.into(),
        });
        id
    }

    /// Remove an actor by id. No-op on an unknown id; ids are not reused.
    pub fn remove(&mut self, id: u32) {
        self.actors.retain(|actor| actor.id != id);
    }

    /// Actor by id.
    pub fn by_id(&self, id: u32) -> Option<&Actor> {
        self.actors.iter().find(|actor| actor.id == id)
    }

    /// Actor by display name.
    pub fn by_name(&self, name: &str) -> Option<&Actor> {
        self.actors.iter().find(|actor| actor.name == name)
    }

    /// Actors in roster order.
    pub fn iter(&self) -> impl Iterator<Item = &Actor> {
        self.actors.iter()
    }

    /// Number of actors.
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    /// True when no actor is registered.
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}
