//! Turnstile: a minimal reconciling finite-state-machine engine.
//!
//! A host application declares named states, the legal transitions between
//! them, and optional callbacks invoked on each transition. Turnstile
//! validates the topology once, at construction, and keeps the hot path a
//! map lookup plus a set-membership check. Concurrent reconcile requests
//! on one machine serialize behind a single lock.
//!
//! # Core Concepts
//!
//! - **StateDefinition**: caller-authored declaration of a state (initial
//!   flag, outgoing transitions, optional enter callback)
//! - **Machine**: the validated topology plus the single mutable
//!   current-state cell
//! - **Reconcile**: the one state-changing operation; commit-then-notify,
//!   no rollback on callback failure
//!
//! # Example
//!
//! ```rust
//! use turnstile::{definitions, Machine, StateDefinition};
//!
//! let machine: Machine<()> = Machine::new(
//!     "",
//!     definitions! {
//!         "OPEN" => StateDefinition::new().initial().transition("CLOSED"),
//!         "CLOSED" => StateDefinition::new().transitions(["OPEN", "STORED"]),
//!         "STORED" => StateDefinition::new().transition("OPEN").on_enter(|previous, _| {
//!             println!("stored away, coming from {previous:?}");
//!             Ok(())
//!         }),
//!     },
//!     None,
//! )?;
//!
//! assert_eq!(machine.current_state_name(), None);
//! machine.reconcile("OPEN", &())?;
//! machine.reconcile("CLOSED", &())?;
//! machine.reconcile("STORED", &())?;
//! assert_eq!(machine.current_state_name().as_deref(), Some("STORED"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builder;
pub mod core;
pub mod engine;
pub mod error;

// Re-export commonly used types
pub use builder::MachineBuilder;
pub use core::{EnterCallback, StateDefinition, TransitionCallback};
pub use engine::Machine;
pub use error::{BuildError, CallbackError, TransitionError};
