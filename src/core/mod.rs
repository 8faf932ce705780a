//! Core building blocks of a transition table.
//!
//! This module contains the values a table is made of:
//! - State definitions via the `State` trait
//! - Event tags and the reserved pseudo-events
//! - Guards and actions with their composition algebra
//! - The type-indexed dependency pool and argument resolution

mod action;
mod context;
mod deps;
mod event;
mod guard;
mod state;

pub use action::{process_event, seq, Action, IntoAction};
pub use context::Context;
pub use deps::{Dependencies, IntoDependencies, TypeKey};
pub use event::{Anonymous, EventTag, OnEntry, OnExit};
pub use guard::{and, not, or, Guard, IntoGuard};
pub use state::State;
