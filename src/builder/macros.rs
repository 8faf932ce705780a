//! Macros for ergonomic state machine construction.

/// Generate a fieldless state enum and its `State` implementation.
///
/// Variants listed under `terminal:` report `is_terminal() == true` and are
/// drawn as sinks by introspection.
///
/// # Example
///
/// ```
/// use tabula::state_enum;
/// use tabula::core::State;
///
/// state_enum! {
///     pub enum Session {
///         Idle,
///         Handshake,
///         Established,
///         Closed,
///     }
///     terminal: [Closed]
/// }
///
/// assert_eq!(Session::Handshake.name(), "Handshake");
/// assert!(Session::Closed.is_terminal());
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }

        $(terminal: [$($terminal:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            #[allow(unreachable_patterns)]
            fn is_terminal(&self) -> bool {
                match self {
                    $($(Self::$terminal => true,)*)?
                    _ => false,
                }
            }
        }
    };
}
