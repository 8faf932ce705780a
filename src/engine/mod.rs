//! Compiled transition tables and their dispatch loop.
//!
//! Construction flows one way: the declared table is numbered by the
//! [`Registry`], bucketed by the [`PartitionTable`] and frozen inside a
//! [`StateMachine`]. At runtime only the current state id changes.

pub mod dispatcher;
pub mod introspect;
pub mod machine;
pub mod partition;
pub mod registry;
pub mod transition;

pub use dispatcher::Dispatcher;
pub use introspect::{Endpoint, EventLabel, TransitionInfo, Transitions};
pub use machine::{Outcome, StateMachine};
pub use partition::{Candidate, PartitionTable};
pub use registry::{EventId, Registry, StateId};
pub use transition::Transition;
