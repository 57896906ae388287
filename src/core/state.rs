//! Built state nodes.
//!
//! States hold transition targets as names, not references, so declaration
//! cycles and forward references cost nothing. Names are resolved against
//! the machine's state map at reconcile time.

use crate::core::definition::{EnterCallback, StateDefinition};
use std::collections::HashSet;

/// A validated, immutable node in a machine's topology.
///
/// Built once from a `StateDefinition` during machine construction and
/// never mutated afterwards. Every name in `outgoing` is guaranteed to be
/// a key of the owning machine's state map.
pub(crate) struct State<A> {
    pub(crate) name: String,
    pub(crate) initial: bool,
    pub(crate) outgoing: HashSet<String>,
    pub(crate) on_enter: Option<EnterCallback<A>>,
}

impl<A> State<A> {
    /// Build a node from a caller-authored definition. Duplicate transition
    /// names collapse; only membership matters from here on.
    pub(crate) fn from_definition(name: String, definition: StateDefinition<A>) -> Self {
        Self {
            name,
            initial: definition.initial,
            outgoing: definition.transitions.into_iter().collect(),
            on_enter: definition.on_enter,
        }
    }

    /// Whether this state declares a transition to `target`.
    pub(crate) fn is_possible_transition(&self, target: &str) -> bool {
        self.outgoing.contains(target)
    }
}
