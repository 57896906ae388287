//! Error types for machine construction and transition execution.

use thiserror::Error;

/// Error type returned by caller-supplied callbacks.
///
/// The engine propagates callback errors verbatim; it never wraps or
/// annotates them.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while validating state definitions and building
/// a machine.
///
/// Construction is all-or-nothing: on any of these, no machine is produced.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// A state definition was keyed by the empty string.
    #[error("invalid state: can't define a state with an empty name")]
    IllegalStateName,

    /// A state definition lists a transition to a name with no
    /// corresponding definition.
    #[error("invalid state: '{from}' can't reference undefined state '{target}'")]
    UndefinedState { from: String, target: String },
}

/// Errors that can occur when reconciling a machine toward a target state.
#[derive(Debug, Error)]
pub enum TransitionError {
    /// The target is not a defined state, or is defined but not reachable
    /// from the current state. The current state is unchanged.
    #[error("invalid transition: can't undergo an undefined transition to '{target}'")]
    UndefinedTransition { target: String },

    /// The machine has not entered any state yet and the target is not
    /// flagged as an initial state. The machine remains unstarted.
    #[error("invalid transition: can't transition from nil state to non-initial state '{target}'")]
    NilToNonInitialTransition { target: String },

    /// A caller-supplied callback failed. By the time a callback runs the
    /// transition has already been committed; the current state is not
    /// rolled back.
    #[error(transparent)]
    Callback(#[from] CallbackError),
}

impl TransitionError {
    /// Whether this error left the machine's state untouched.
    ///
    /// Structural errors are rejected before anything mutates; callback
    /// errors surface after the state swap has been committed.
    pub fn is_structural(&self) -> bool {
        !matches!(self, TransitionError::Callback(_))
    }
}
