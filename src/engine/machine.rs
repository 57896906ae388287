//! The machine: a validated topology plus one lock-guarded current-state cell.

use crate::core::{State, StateDefinition, TransitionCallback};
use crate::error::{BuildError, TransitionError};
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::{debug, trace};

/// A finite-state machine over a statically validated topology.
///
/// The state map is immutable after construction; the current-state cell is
/// the only mutable field and is guarded by a single lock, so concurrent
/// [`reconcile`](Machine::reconcile) calls on one machine serialize. Each
/// machine is fully self-contained and independently lockable.
///
/// `A` is the opaque argument type passed through to callbacks unexamined.
///
/// # Example
///
/// ```rust
/// use turnstile::{definitions, Machine, StateDefinition};
///
/// let machine: Machine<()> = Machine::new(
///     "",
///     definitions! {
///         "ON" => StateDefinition::new().initial().transition("OFF"),
///         "OFF" => StateDefinition::new().transition("ON"),
///     },
///     None,
/// )?;
///
/// machine.reconcile("ON", &())?;
/// machine.reconcile("OFF", &())?;
/// assert_eq!(machine.current_state_name().as_deref(), Some("OFF"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Machine<A> {
    states: HashMap<String, State<A>>,
    current: Mutex<Option<String>>,
    on_transition: Option<TransitionCallback<A>>,
}

impl<A> Machine<A> {
    /// Validate `definitions` and build a machine.
    ///
    /// Every definition is checked before any state is built: an empty
    /// name fails with [`BuildError::IllegalStateName`], and a transition
    /// target without a definition fails with [`BuildError::UndefinedState`].
    /// Construction is all-or-nothing.
    ///
    /// `initial_state` is resolved lazily, never validated: if it names a
    /// defined state the machine starts there, with no callback invoked;
    /// if it is empty or names nothing, the machine starts unstarted and
    /// the first `reconcile` call is held to the initial-state rule.
    ///
    /// `on_transition`, if supplied, runs on every committed transition
    /// before the target state's own callback.
    pub fn new(
        initial_state: &str,
        definitions: HashMap<String, StateDefinition<A>>,
        on_transition: Option<TransitionCallback<A>>,
    ) -> Result<Self, BuildError> {
        for (name, definition) in &definitions {
            if name.is_empty() {
                return Err(BuildError::IllegalStateName);
            }
            for target in &definition.transitions {
                if !definitions.contains_key(target) {
                    return Err(BuildError::UndefinedState {
                        from: name.clone(),
                        target: target.clone(),
                    });
                }
            }
        }

        let states: HashMap<String, State<A>> = definitions
            .into_iter()
            .map(|(name, definition)| (name.clone(), State::from_definition(name, definition)))
            .collect();

        let current = states
            .contains_key(initial_state)
            .then(|| initial_state.to_string());

        debug!(states = states.len(), initial = ?current, "machine built");

        Ok(Self {
            states,
            current: Mutex::new(current),
            on_transition,
        })
    }

    /// Attempt a transition to the state named `target`.
    ///
    /// Legality is a map lookup plus a set-membership check against the
    /// current state's declared transitions; no graph traversal happens
    /// here. Reconciling to the current state is a no-op success that
    /// invokes no callbacks.
    ///
    /// On a legal transition the current state is swapped **before** any
    /// callback runs: the machine-wide callback first with the target
    /// name, then the target's own enter callback with the previous name
    /// (`None` if the machine was unstarted). A callback error is returned
    /// verbatim and the swap is not rolled back; the transition has
    /// logically occurred even though the reaction to it failed. Callers
    /// needing atomicity must reconcile back explicitly.
    ///
    /// The whole operation holds the machine's lock, callbacks included.
    /// A callback must not call back into the same machine or it will
    /// deadlock.
    pub fn reconcile(&self, target: &str, args: &A) -> Result<(), TransitionError> {
        let mut current = self.current.lock();

        let next =
            self.states
                .get(target)
                .ok_or_else(|| TransitionError::UndefinedTransition {
                    target: target.to_string(),
                })?;

        match current.as_deref() {
            None => {
                if !next.initial {
                    return Err(TransitionError::NilToNonInitialTransition {
                        target: target.to_string(),
                    });
                }
            }
            Some(name) if name == target => {
                trace!(state = target, "already reconciled, nothing to do");
                return Ok(());
            }
            Some(name) => {
                if !self.states[name].is_possible_transition(target) {
                    return Err(TransitionError::UndefinedTransition {
                        target: target.to_string(),
                    });
                }
            }
        }

        let previous = current.replace(next.name.clone());
        debug!(from = ?previous, to = target, "transition committed");

        if let Some(on_transition) = &self.on_transition {
            on_transition(target, args).map_err(TransitionError::Callback)?;
        }

        if let Some(on_enter) = &next.on_enter {
            on_enter(previous.as_deref(), args).map_err(TransitionError::Callback)?;
        }

        Ok(())
    }

    /// Name of the state the machine is currently in, or `None` if no
    /// state has been entered yet. Waits for any in-flight transition.
    pub fn current_state_name(&self) -> Option<String> {
        self.current.lock().clone()
    }

    /// Whether `reconcile(target, ..)` would pass the legality checks
    /// right now, without mutating anything or invoking callbacks.
    ///
    /// Reconciling to the current state counts as legal (it would be a
    /// no-op success).
    pub fn can_reconcile(&self, target: &str) -> bool {
        let current = self.current.lock();

        let Some(next) = self.states.get(target) else {
            return false;
        };

        match current.as_deref() {
            None => next.initial,
            Some(name) if name == target => true,
            Some(name) => self.states[name].is_possible_transition(target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn toggle() -> Machine<()> {
        Machine::new(
            "",
            definitions! {
                "ON" => StateDefinition::new().initial().transition("OFF"),
                "OFF" => StateDefinition::new().transition("ON"),
            },
            None,
        )
        .unwrap()
    }

    #[test]
    fn fresh_machine_has_no_state() {
        let machine = toggle();
        assert_eq!(machine.current_state_name(), None);
    }

    #[test]
    fn empty_definition_key_is_rejected() {
        let result: Result<Machine<()>, _> = Machine::new(
            "",
            definitions! {
                "" => StateDefinition::new().transition("OFF"),
                "OFF" => StateDefinition::new(),
            },
            None,
        );

        assert_eq!(result.err(), Some(BuildError::IllegalStateName));
    }

    #[test]
    fn dangling_reference_is_rejected() {
        let result: Result<Machine<()>, _> = Machine::new(
            "",
            definitions! {
                "ON" => StateDefinition::new().transition("SOME_UNDEFINED_STATE"),
                "OFF" => StateDefinition::new(),
            },
            None,
        );

        assert_eq!(
            result.err(),
            Some(BuildError::UndefinedState {
                from: "ON".to_string(),
                target: "SOME_UNDEFINED_STATE".to_string(),
            })
        );
    }

    #[test]
    fn self_reference_is_accepted() {
        let result: Result<Machine<()>, _> = Machine::new(
            "",
            definitions! {
                "LOOP" => StateDefinition::new().initial().transition("LOOP"),
            },
            None,
        );

        assert!(result.is_ok());
    }

    #[test]
    fn named_initial_state_starts_the_machine_there() {
        let machine: Machine<()> = Machine::new(
            "OFF",
            definitions! {
                "ON" => StateDefinition::new().initial().transition("OFF"),
                "OFF" => StateDefinition::new().transition("ON"),
            },
            None,
        )
        .unwrap();

        assert_eq!(machine.current_state_name().as_deref(), Some("OFF"));
    }

    #[test]
    fn named_initial_state_skips_callbacks() {
        let entered = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&entered);

        let machine: Machine<()> = Machine::new(
            "ON",
            definitions! {
                "ON" => StateDefinition::new().initial().on_enter(move |_, _| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }),
            },
            None,
        )
        .unwrap();

        assert_eq!(machine.current_state_name().as_deref(), Some("ON"));
        assert_eq!(entered.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unknown_initial_state_is_silently_ignored() {
        let machine: Machine<()> = Machine::new(
            "NOPE",
            definitions! {
                "ON" => StateDefinition::new().initial(),
            },
            None,
        )
        .unwrap();

        assert_eq!(machine.current_state_name(), None);
    }

    #[test]
    fn unstarted_machine_rejects_non_initial_target() {
        let machine = toggle();

        let err = machine.reconcile("OFF", &()).unwrap_err();
        assert!(matches!(
            err,
            TransitionError::NilToNonInitialTransition { ref target } if target == "OFF"
        ));
        assert_eq!(machine.current_state_name(), None);
    }

    #[test]
    fn unstarted_machine_enters_initial_target() {
        let machine = toggle();

        machine.reconcile("ON", &()).unwrap();
        assert_eq!(machine.current_state_name().as_deref(), Some("ON"));
    }

    #[test]
    fn unknown_target_is_undefined_transition() {
        let machine = toggle();

        let err = machine.reconcile("BOLLOCKS", &()).unwrap_err();
        assert!(matches!(err, TransitionError::UndefinedTransition { .. }));
        assert_eq!(machine.current_state_name(), None);

        machine.reconcile("ON", &()).unwrap();
        let err = machine.reconcile("BOLLOCKS", &()).unwrap_err();
        assert!(matches!(err, TransitionError::UndefinedTransition { .. }));
        assert_eq!(machine.current_state_name().as_deref(), Some("ON"));
    }

    #[test]
    fn undeclared_edge_is_rejected_without_mutation() {
        let machine: Machine<()> = Machine::new(
            "",
            definitions! {
                "A" => StateDefinition::new().initial().transition("B"),
                "B" => StateDefinition::new(),
                "C" => StateDefinition::new(),
            },
            None,
        )
        .unwrap();

        machine.reconcile("A", &()).unwrap();
        let err = machine.reconcile("C", &()).unwrap_err();

        assert!(matches!(err, TransitionError::UndefinedTransition { .. }));
        assert_eq!(machine.current_state_name().as_deref(), Some("A"));
    }

    #[test]
    fn self_reconciliation_is_a_silent_no_op() {
        let entered = Arc::new(AtomicUsize::new(0));
        let global = Arc::new(AtomicUsize::new(0));

        let enter_counter = Arc::clone(&entered);
        let global_counter = Arc::clone(&global);

        let machine: Machine<()> = Machine::new(
            "",
            definitions! {
                "ON" => StateDefinition::new().initial().on_enter(move |_, _| {
                    enter_counter.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }),
            },
            Some(Arc::new(move |_, _| {
                global_counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })),
        )
        .unwrap();

        machine.reconcile("ON", &()).unwrap();
        assert_eq!(entered.load(Ordering::SeqCst), 1);
        assert_eq!(global.load(Ordering::SeqCst), 1);

        machine.reconcile("ON", &()).unwrap();
        assert_eq!(entered.load(Ordering::SeqCst), 1);
        assert_eq!(global.load(Ordering::SeqCst), 1);
        assert_eq!(machine.current_state_name().as_deref(), Some("ON"));
    }

    #[test]
    fn enter_callback_sees_previous_name_and_args() {
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let machine: Machine<u32> = Machine::new(
            "",
            definitions! {
                "A" => StateDefinition::new().initial().transition("B"),
                "B" => StateDefinition::new().on_enter(move |previous, args: &u32| {
                    sink.lock().push((previous.map(str::to_string), *args));
                    Ok(())
                }),
            },
            None,
        )
        .unwrap();

        machine.reconcile("A", &1).unwrap();
        machine.reconcile("B", &2).unwrap();

        assert_eq!(seen.lock().as_slice(), &[(Some("A".to_string()), 2)]);
    }

    #[test]
    fn enter_callback_sees_absent_previous_on_first_entry() {
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let machine: Machine<()> = Machine::new(
            "",
            definitions! {
                "A" => StateDefinition::new().initial().on_enter(move |previous, _| {
                    sink.lock().push(previous.map(str::to_string));
                    Ok(())
                }),
            },
            None,
        )
        .unwrap();

        machine.reconcile("A", &()).unwrap();
        assert_eq!(seen.lock().as_slice(), &[None]);
    }

    #[test]
    fn failing_enter_callback_does_not_roll_back() {
        let machine: Machine<()> = Machine::new(
            "",
            definitions! {
                "A" => StateDefinition::new().initial().on_enter(|_, _| Err("failing".into())),
            },
            None,
        )
        .unwrap();

        let err = machine.reconcile("A", &()).unwrap_err();

        assert_eq!(err.to_string(), "failing");
        assert_eq!(machine.current_state_name().as_deref(), Some("A"));
    }

    #[test]
    fn failing_global_callback_skips_enter_callback() {
        let entered = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&entered);

        let machine: Machine<()> = Machine::new(
            "",
            definitions! {
                "A" => StateDefinition::new().initial().on_enter(move |_, _| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }),
            },
            Some(Arc::new(|_, _| Err("reconcile update failed".into()))),
        )
        .unwrap();

        let err = machine.reconcile("A", &()).unwrap_err();

        assert_eq!(err.to_string(), "reconcile update failed");
        assert_eq!(entered.load(Ordering::SeqCst), 0);
        assert_eq!(machine.current_state_name().as_deref(), Some("A"));
    }

    #[test]
    fn can_reconcile_probes_without_effects() {
        let machine = toggle();

        assert!(machine.can_reconcile("ON"));
        assert!(!machine.can_reconcile("OFF"));
        assert!(!machine.can_reconcile("BOLLOCKS"));
        assert_eq!(machine.current_state_name(), None);

        machine.reconcile("ON", &()).unwrap();
        assert!(machine.can_reconcile("ON"));
        assert!(machine.can_reconcile("OFF"));
        assert!(!machine.can_reconcile("BOLLOCKS"));
    }
}
