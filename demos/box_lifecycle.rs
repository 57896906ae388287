//! Box Lifecycle
//!
//! This example demonstrates the smallest useful machine: a box that can
//! be opened, closed, and put into storage.
//!
//! Key concepts:
//! - Declaring a topology with `definitions!`
//! - Initial-state rules (the first transition must target an initial state)
//! - Idempotent self-reconciliation
//! - Structural errors leaving the state untouched
//!
//! Run with: cargo run --example box_lifecycle

use turnstile::{definitions, Machine, StateDefinition};

const OPEN: &str = "OPEN";
const CLOSED: &str = "CLOSED";
const STORED: &str = "STORED";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let machine: Machine<()> = Machine::new(
        "",
        definitions! {
            OPEN => StateDefinition::new()
                .initial()
                .transition(CLOSED)
                .on_enter(|previous, _| {
                    match previous {
                        None => println!("box initialized to {OPEN}"),
                        Some(from) => println!("box transitioning to {OPEN} from {from}"),
                    }
                    Ok(())
                }),
            CLOSED => StateDefinition::new().transitions([OPEN, STORED]),
            STORED => StateDefinition::new()
                .transition(OPEN)
                .on_enter(|previous, _| {
                    println!("box transitioning to {STORED} from {}", previous.unwrap_or("-"));
                    Ok(())
                }),
        },
        None,
    )?;

    println!("current state: {:?}", machine.current_state_name());

    // The first transition must target an initial state.
    if let Err(err) = machine.reconcile(CLOSED, &()) {
        println!("rejected as expected: {err}");
    }

    machine.reconcile(OPEN, &())?;

    // Reconciling to the current state is a silent no-op.
    machine.reconcile(OPEN, &())?;

    // OPEN has no edge to STORED; the box has to be closed first.
    if let Err(err) = machine.reconcile(STORED, &()) {
        println!("rejected as expected: {err}");
    }

    machine.reconcile(CLOSED, &())?;
    machine.reconcile(STORED, &())?;

    println!("current state: {:?}", machine.current_state_name());

    Ok(())
}
