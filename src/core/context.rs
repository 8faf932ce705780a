//! Argument resolution for guards and actions.

use crate::core::deps::TypeKey;
use crate::core::State;
use crate::engine::StateMachine;
use std::any::Any;

/// Everything a guard or action can draw its arguments from during one
/// dispatch: the event being processed and the machine processing it (which
/// in turn owns the dependency pool).
pub struct Context<'a, S: State> {
    event: &'a dyn Any,
    machine: &'a StateMachine<S>,
}

impl<'a, S: State> Context<'a, S> {
    pub(crate) fn new(event: &'a dyn Any, machine: &'a StateMachine<S>) -> Self {
        Self { event, machine }
    }

    pub fn machine(&self) -> &'a StateMachine<S> {
        self.machine
    }

    /// Resolve a parameter of type `T`.
    ///
    /// The event wins over the machine, which wins over the pool.
    pub fn try_resolve<T: Any>(&self) -> Option<&'a T> {
        if let Some(event) = self.event.downcast_ref::<T>() {
            return Some(event);
        }
        let machine: &'a dyn Any = self.machine;
        if let Some(machine) = machine.downcast_ref::<T>() {
            return Some(machine);
        }
        self.machine.dependencies().get::<T>()
    }

    /// Resolve a parameter whose availability was checked when the machine
    /// was built.
    pub(crate) fn resolve<T: Any>(&self) -> &'a T {
        self.try_resolve::<T>()
            .expect("parameter types are validated when the machine is built")
    }
}

/// Drop the machine type and repeated entries from a parameter list.
pub(crate) fn dependency_keys<S: State>(keys: Vec<TypeKey>) -> Vec<TypeKey> {
    let machine = TypeKey::of::<StateMachine<S>>();
    let mut deps = Vec::with_capacity(keys.len());
    for key in keys {
        if key != machine && !deps.contains(&key) {
            deps.push(key);
        }
    }
    deps
}
