//! Tabula: table-driven finite state machines with dependency injection
//!
//! A machine is declared as a flat table of transitions,
//! `from + event [guard] / action = to`, and compiled once into a dense
//! per (event, state) lookup. Dispatch never allocates for the common path
//! and never fails: an event either fires the first transition whose guard
//! passes or leaves the machine untouched.
//!
//! # Core Concepts
//!
//! - **State**: any `Clone + PartialEq + Debug` value implementing `State`
//! - **Event**: any `'static` value; its Rust type is its tag
//! - **Guards and actions**: plain closures or functions whose parameters
//!   are resolved by type from the event, the machine, or the dependency pool
//! - **Dependency pool**: values bound at construction, checked against every
//!   guard and action before the machine is returned
//!
//! Pseudo-events [`OnEntry`](core::OnEntry) and [`OnExit`](core::OnExit) are
//! ordinary tags. The engine never dispatches them on a state change; hooks
//! declared on them run only when they are dispatched explicitly.
//!
//! An event dispatched from inside a guard or action of the same machine is
//! queued and processed after the running transition has committed.
//!
//! # Example
//!
//! ```rust
//! use tabula::builder::{transition, StateMachineBuilder};
//! use tabula::state_enum;
//! use std::sync::atomic::{AtomicU32, Ordering};
//!
//! state_enum! {
//!     enum Session {
//!         Idle,
//!         Connected,
//!         Closed,
//!     }
//!     terminal: [Closed]
//! }
//!
//! struct Connect {
//!     retries: u32,
//! }
//! struct Disconnect;
//!
//! struct MaxRetries(u32);
//! struct Opened(AtomicU32);
//!
//! let machine = StateMachineBuilder::new()
//!     .initial(Session::Idle)
//!     .transition(
//!         transition(Session::Idle)
//!             .on::<Connect>()
//!             .when(|e: &Connect, max: &MaxRetries| e.retries <= max.0)
//!             .then(|opened: &Opened| {
//!                 opened.0.fetch_add(1, Ordering::Relaxed);
//!             })
//!             .to(Session::Connected),
//!     )?
//!     .transition(transition(Session::Connected).on::<Disconnect>().to(Session::Closed))?
//!     .dependencies((MaxRetries(3), Opened(AtomicU32::new(0))))?
//!     .build()?;
//!
//! assert!(!machine.process_event(Connect { retries: 9 }));
//! assert!(machine.process_event(Connect { retries: 1 }));
//! assert!(machine.process_event(Disconnect));
//! assert!(machine.is_terminal());
//! # Ok::<(), tabula::builder::BuildError>(())
//! ```

pub mod builder;
pub mod core;
pub mod engine;

// Re-export commonly used types
pub use builder::{transition, BuildError, Configure, StateMachineBuilder};
pub use core::{Action, Dependencies, Guard, State};
pub use engine::{Dispatcher, Outcome, StateMachine};
