//! Core data model: caller-authored definitions and built state nodes.
//!
//! Everything here is plain data. Topology validation lives in the engine's
//! constructor; execution lives in [`crate::engine`].

mod definition;
mod state;

pub use definition::{EnterCallback, StateDefinition, TransitionCallback};

pub(crate) use state::State;
