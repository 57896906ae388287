//! Builder API for ergonomic machine construction.
//!
//! This module provides a fluent builder and a map-literal macro for
//! declaring machines with minimal boilerplate. Both feed the same
//! validating constructor.

pub mod machine;
pub mod macros;

pub use machine::MachineBuilder;
