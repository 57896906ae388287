//! Caller-authored state definitions.
//!
//! A machine is declared as a mapping from state name to `StateDefinition`.
//! Definitions are plain data apart from the optional callback, so a
//! topology can be authored in (or loaded from) a serialized form and the
//! callbacks attached in code afterwards.

use crate::error::CallbackError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Callback invoked when a state is entered via a committed transition.
///
/// Receives the name of the state being left (`None` if the machine was
/// unstarted) and the caller's opaque argument bundle.
pub type EnterCallback<A> =
    Arc<dyn Fn(Option<&str>, &A) -> Result<(), CallbackError> + Send + Sync>;

/// Machine-wide callback invoked on every committed transition, before the
/// target state's own callback.
///
/// Receives the name of the state being entered and the caller's opaque
/// argument bundle.
pub type TransitionCallback<A> =
    Arc<dyn Fn(&str, &A) -> Result<(), CallbackError> + Send + Sync>;

/// A single state as declared by the caller.
///
/// `A` is the opaque argument type handed through to callbacks; the engine
/// never inspects it.
///
/// # Example
///
/// ```rust
/// use turnstile::StateDefinition;
///
/// let open: StateDefinition<()> = StateDefinition::new()
///     .initial()
///     .transition("CLOSED")
///     .on_enter(|previous, _args| {
///         match previous {
///             Some(from) => println!("opened from {from}"),
///             None => println!("opened as the first state"),
///         }
///         Ok(())
///     });
///
/// assert!(open.initial);
/// assert_eq!(open.transitions, vec!["CLOSED".to_string()]);
/// ```
#[derive(Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateDefinition<A> {
    /// Whether the machine may enter this state from its unstarted
    /// condition. More than one definition may set this.
    #[serde(default)]
    pub initial: bool,

    /// Names of the states reachable from this one, in declaration order.
    /// Duplicates and self-references are permitted; only membership
    /// matters to the engine.
    #[serde(default)]
    pub transitions: Vec<String>,

    /// Reaction invoked after a transition into this state commits.
    /// Not part of the serialized form.
    #[serde(skip)]
    pub on_enter: Option<EnterCallback<A>>,
}

impl<A> StateDefinition<A> {
    /// Create an empty definition: not initial, no transitions, no callback.
    pub fn new() -> Self {
        Self {
            initial: false,
            transitions: Vec::new(),
            on_enter: None,
        }
    }

    /// Flag this state as eligible to be entered first.
    pub fn initial(mut self) -> Self {
        self.initial = true;
        self
    }

    /// Add one outgoing transition target.
    pub fn transition(mut self, target: impl Into<String>) -> Self {
        self.transitions.push(target.into());
        self
    }

    /// Add several outgoing transition targets at once.
    pub fn transitions<I, T>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.transitions.extend(targets.into_iter().map(Into::into));
        self
    }

    /// Attach the enter callback.
    pub fn on_enter<F>(mut self, callback: F) -> Self
    where
        F: Fn(Option<&str>, &A) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        self.on_enter = Some(Arc::new(callback));
        self
    }
}

impl<A> Default for StateDefinition<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Clone for StateDefinition<A> {
    fn clone(&self) -> Self {
        Self {
            initial: self.initial,
            transitions: self.transitions.clone(),
            on_enter: self.on_enter.as_ref().map(Arc::clone),
        }
    }
}

impl<A> fmt::Debug for StateDefinition<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateDefinition")
            .field("initial", &self.initial)
            .field("transitions", &self.transitions)
            .field("on_enter", &self.on_enter.as_ref().map(|_| "<callback>"))
            .finish()
    }
}
