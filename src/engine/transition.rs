//! Transition descriptors.

use crate::core::{Action, Context, EventTag, Guard, State, TypeKey};

/// One row of a transition table: `from + event [guard] / action = to`.
pub struct Transition<S: State> {
    pub from: S,
    pub to: S,
    pub event: EventTag,
    pub guard: Guard<S>,
    pub action: Action<S>,
    deps: Vec<TypeKey>,
}

impl<S: State> Transition<S> {
    pub fn new(from: S, to: S, event: EventTag, guard: Guard<S>, action: Action<S>) -> Self {
        let deps = required_deps(&event, &guard, &action);
        Self {
            from,
            to,
            event,
            guard,
            action,
            deps,
        }
    }

    /// Pool types the guard and action need: the union of their requirements,
    /// minus the transition's own event type.
    pub fn deps(&self) -> &[TypeKey] {
        &self.deps
    }

    /// Whether source and destination are the same state.
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }

    /// Evaluate the guard and, if it passes, run the action.
    ///
    /// Returns whether the transition fired. Updating the current state is
    /// left to the caller.
    pub(crate) fn execute(&self, ctx: &Context<'_, S>) -> bool {
        if !self.guard.check(ctx) {
            return false;
        }
        self.action.run(ctx);
        true
    }
}

impl<S: State> Clone for Transition<S> {
    fn clone(&self) -> Self {
        Self {
            from: self.from.clone(),
            to: self.to.clone(),
            event: self.event,
            guard: self.guard.clone(),
            action: self.action.clone(),
            deps: self.deps.clone(),
        }
    }
}

impl<S: State> std::fmt::Debug for Transition<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transition")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("event", &self.event.name())
            .field("guard", &self.guard.name())
            .field("action", &self.action.name())
            .finish()
    }
}

fn required_deps<S: State>(event: &EventTag, guard: &Guard<S>, action: &Action<S>) -> Vec<TypeKey> {
    let mut deps: Vec<TypeKey> = Vec::new();
    for key in guard.requires().iter().chain(action.requires()) {
        if key.id() != event.id() && !deps.contains(key) {
            deps.push(*key);
        }
    }
    deps
}
