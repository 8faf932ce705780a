//! Core State trait for transition-table states.
//!
//! States are plain values. The engine only needs to compare them, clone them
//! into its registry and ask for a display label.

use std::fmt::Debug;

/// Trait for state machine states.
///
/// All methods are pure. A state value names a node of the topology; the
/// engine assigns it a dense id when the transition table is compiled.
///
/// # Required Traits
///
/// - `Clone`: states are copied into the registry
/// - `PartialEq`: states are deduplicated by equality while compiling
/// - `Debug`: states must be debuggable for diagnostics
/// - `Send + 'static`: machines own their states and may move between threads
///
/// # Example
///
/// ```rust
/// use tabula::core::State;
///
/// #[derive(Clone, PartialEq, Debug)]
/// enum Link {
///     Down,
///     Negotiating,
///     Up,
///     Closed,
/// }
///
/// impl State for Link {
///     fn name(&self) -> &str {
///         match self {
///             Self::Down => "Down",
///             Self::Negotiating => "Negotiating",
///             Self::Up => "Up",
///             Self::Closed => "Closed",
///         }
///     }
///
///     fn is_terminal(&self) -> bool {
///         matches!(self, Self::Closed)
///     }
/// }
/// ```
pub trait State: Clone + PartialEq + Debug + Send + 'static {
    /// Get the state's label for display and introspection.
    fn name(&self) -> &str;

    /// Check if this is the reserved terminal sink.
    ///
    /// The engine does not enforce that terminal states have no outgoing
    /// transitions; the flag only affects introspection.
    ///
    /// Default implementation returns `false`.
    fn is_terminal(&self) -> bool {
        false
    }
}
