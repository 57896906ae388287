//! Builder for constructing machines.

use crate::core::{StateDefinition, TransitionCallback};
use crate::engine::Machine;
use crate::error::{BuildError, CallbackError};
use std::collections::HashMap;
use std::sync::Arc;

/// Builder for constructing machines with a fluent API.
///
/// A thin layer over [`Machine::new`]; validation happens once, in
/// `build()`, through the same path.
///
/// # Example
///
/// ```rust
/// use turnstile::{MachineBuilder, StateDefinition};
///
/// let machine: turnstile::Machine<()> = MachineBuilder::new()
///     .state("OPEN", StateDefinition::new().initial().transition("CLOSED"))
///     .state("CLOSED", StateDefinition::new().transition("OPEN"))
///     .initial_state("OPEN")
///     .build()?;
///
/// assert_eq!(machine.current_state_name().as_deref(), Some("OPEN"));
/// # Ok::<(), turnstile::BuildError>(())
/// ```
pub struct MachineBuilder<A> {
    initial_state: String,
    definitions: HashMap<String, StateDefinition<A>>,
    on_transition: Option<TransitionCallback<A>>,
}

impl<A> MachineBuilder<A> {
    /// Create a new builder with no states and no starting point.
    pub fn new() -> Self {
        Self {
            initial_state: String::new(),
            definitions: HashMap::new(),
            on_transition: None,
        }
    }

    /// Name the state the machine starts in (optional). Resolved lazily
    /// at build time: an empty or unknown name leaves the machine
    /// unstarted.
    pub fn initial_state(mut self, name: impl Into<String>) -> Self {
        self.initial_state = name.into();
        self
    }

    /// Add one state definition. A repeated name replaces the earlier
    /// definition.
    pub fn state(mut self, name: impl Into<String>, definition: StateDefinition<A>) -> Self {
        self.definitions.insert(name.into(), definition);
        self
    }

    /// Add several state definitions at once.
    pub fn states(mut self, definitions: HashMap<String, StateDefinition<A>>) -> Self {
        self.definitions.extend(definitions);
        self
    }

    /// Attach a machine-wide callback invoked on every committed
    /// transition, before the target state's own callback.
    pub fn on_transition<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str, &A) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        self.on_transition = Some(Arc::new(callback));
        self
    }

    /// Validate the collected definitions and build the machine.
    pub fn build(self) -> Result<Machine<A>, BuildError> {
        Machine::new(&self.initial_state, self.definitions, self.on_transition)
    }
}

impl<A> Default for MachineBuilder<A> {
    fn default() -> Self {
        Self::new()
    }
}
