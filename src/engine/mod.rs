//! Transition execution.
//!
//! The engine owns the validated topology and the single mutable
//! current-state cell, and serializes concurrent reconcile requests.

mod machine;

pub use machine::Machine;
