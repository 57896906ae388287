//! Order Processing
//!
//! This example demonstrates an order delivery pipeline with a machine-wide
//! audit callback and an argument bundle passed through to callbacks.
//!
//! Key concepts:
//! - Delivery states (Shipped -> InDepot -> OutForDelivery -> Delivered)
//! - A machine-wide callback running before each state's own callback
//! - An opaque argument type carrying order context the engine never reads
//! - A failed-delivery loop (OutForDelivery -> InDepot)
//!
//! Run with: cargo run --example order_processing

use turnstile::{MachineBuilder, StateDefinition};

const SHIPPED: &str = "SHIPPED";
const IN_DEPOT: &str = "IN_DEPOT";
const OUT_FOR_DELIVERY: &str = "OUT_FOR_DELIVERY";
const DELIVERED: &str = "DELIVERED";

/// Context handed through every reconcile call.
struct Order {
    id: u64,
    destination: &'static str,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let machine = MachineBuilder::new()
        .state(
            SHIPPED,
            StateDefinition::new().initial().transition(IN_DEPOT),
        )
        .state(
            IN_DEPOT,
            StateDefinition::new()
                .transition(OUT_FOR_DELIVERY)
                .on_enter(|previous, order: &Order| {
                    if previous == Some(OUT_FOR_DELIVERY) {
                        println!("order {} returned to depot", order.id);
                    } else {
                        println!("order {} arrived at depot", order.id);
                    }
                    Ok(())
                }),
        )
        .state(
            OUT_FOR_DELIVERY,
            StateDefinition::new()
                .transitions([IN_DEPOT, DELIVERED])
                .on_enter(|_, order: &Order| {
                    println!("order {} out for delivery to {}", order.id, order.destination);
                    Ok(())
                }),
        )
        .state(
            DELIVERED,
            StateDefinition::new().on_enter(|_, order: &Order| {
                println!("order {} delivered", order.id);
                Ok(())
            }),
        )
        .on_transition(|target, order: &Order| {
            println!("audit: order {} -> {target}", order.id);
            Ok(())
        })
        .build()?;

    let order = Order {
        id: 1071,
        destination: "12 Harbour Lane",
    };

    machine.reconcile(SHIPPED, &order)?;
    machine.reconcile(IN_DEPOT, &order)?;
    machine.reconcile(OUT_FOR_DELIVERY, &order)?;

    // Nobody home; the order goes back to the depot and out again.
    machine.reconcile(IN_DEPOT, &order)?;
    machine.reconcile(OUT_FOR_DELIVERY, &order)?;
    machine.reconcile(DELIVERED, &order)?;

    println!("final state: {:?}", machine.current_state_name());

    Ok(())
}
