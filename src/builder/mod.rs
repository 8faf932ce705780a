//! Builder API for ergonomic state machine construction.
//!
//! This module provides fluent builders and macros for declaring transition
//! tables with minimal boilerplate. Every check that can fail runs here, so a
//! machine that builds never fails to dispatch.

pub mod error;
pub mod machine;
pub mod macros;
pub mod transition;

pub use error::BuildError;
pub use machine::{Configure, StateMachineBuilder};
pub use transition::TransitionBuilder;

use crate::core::State;

/// Start a transition from `from`.
///
/// # Example
///
/// ```
/// use tabula::builder::transition;
/// use tabula::state_enum;
///
/// state_enum! {
///     enum Door {
///         Open,
///         Closed,
///     }
/// }
///
/// struct Push;
///
/// let row = transition(Door::Closed).on::<Push>().to(Door::Open).build().unwrap();
/// assert_eq!(row.to, Door::Open);
/// ```
pub fn transition<S: State>(from: S) -> TransitionBuilder<S> {
    TransitionBuilder::new().from(from)
}
