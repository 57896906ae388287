//! Macros for ergonomic machine construction.

/// Build a state-name → definition map literal.
///
/// # Example
///
/// ```rust
/// use turnstile::{definitions, Machine, StateDefinition};
///
/// let machine: Machine<()> = Machine::new(
///     "",
///     definitions! {
///         "OPEN" => StateDefinition::new().initial().transition("CLOSED"),
///         "CLOSED" => StateDefinition::new().transition("OPEN"),
///     },
///     None,
/// )?;
/// # Ok::<(), turnstile::BuildError>(())
/// ```
#[macro_export]
macro_rules! definitions {
    ($($name:expr => $definition:expr),* $(,)?) => {{
        let mut map = ::std::collections::HashMap::new();
        $(
            map.insert(::std::string::String::from($name), $definition);
        )*
        map
    }};
}
