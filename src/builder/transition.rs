//! Builder for constructing state transitions.

use crate::builder::error::BuildError;
use crate::core::{Action, EventTag, Guard, IntoAction, IntoGuard, State};
use crate::engine::Transition;

/// Builder for constructing transitions with a fluent API.
///
/// Only the source state is required. The event defaults to the anonymous
/// tag, the guard to `always`, the action to `none` and the destination to
/// the source.
pub struct TransitionBuilder<S: State> {
    from: Option<S>,
    to: Option<S>,
    event: EventTag,
    guard: Guard<S>,
    action: Action<S>,
}

impl<S: State> TransitionBuilder<S> {
    /// Create a new transition builder.
    pub fn new() -> Self {
        Self {
            from: None,
            to: None,
            event: EventTag::anonymous(),
            guard: Guard::always(),
            action: Action::none(),
        }
    }

    /// Set the source state (required).
    pub fn from(mut self, state: S) -> Self {
        self.from = Some(state);
        self
    }

    /// Set the target state. Omitted, the transition is an internal loop.
    pub fn to(mut self, state: S) -> Self {
        self.to = Some(state);
        self
    }

    /// React to events of type `E`.
    pub fn on<E: 'static>(mut self) -> Self {
        self.event = EventTag::of::<E>();
        self
    }

    /// React to the event described by `tag`.
    pub fn event(mut self, tag: EventTag) -> Self {
        self.event = tag;
        self
    }

    /// Replace the guard with a prepared one.
    pub fn guard(mut self, guard: Guard<S>) -> Self {
        self.guard = guard;
        self
    }

    /// Replace the guard with a closure or function.
    pub fn when<M>(mut self, predicate: impl IntoGuard<S, M>) -> Self {
        self.guard = predicate.into_guard();
        self
    }

    /// Replace the action.
    pub fn action<M>(mut self, action: impl IntoAction<S, M>) -> Self {
        self.action = action.into_action();
        self
    }

    /// Append an action; the first call sets it, later calls sequence after it.
    pub fn then<M>(mut self, action: impl IntoAction<S, M>) -> Self {
        self.action = if self.action.is_none() {
            action.into_action()
        } else {
            self.action.then(action)
        };
        self
    }

    /// Build the transition.
    pub fn build(self) -> Result<Transition<S>, BuildError> {
        let from = self.from.ok_or(BuildError::MissingFromState)?;
        let to = self.to.unwrap_or_else(|| from.clone());

        Ok(Transition::new(from, to, self.event, self.guard, self.action))
    }
}

impl<S: State> Default for TransitionBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TypeKey;

    #[derive(Clone, PartialEq, Debug)]
    enum TestState {
        Initial,
        Processing,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Initial => "Initial",
                Self::Processing => "Processing",
            }
        }
    }

    struct Submit;
    struct Quota(u32);

    fn audit() {}
    fn notify() {}

    #[test]
    fn builder_validates_required_fields() {
        let result = TransitionBuilder::<TestState>::new()
            .to(TestState::Processing)
            .build();

        assert!(matches!(result, Err(BuildError::MissingFromState)));
    }

    #[test]
    fn defaults_fill_optional_parts() {
        let transition = TransitionBuilder::new()
            .from(TestState::Initial)
            .build()
            .unwrap();

        assert_eq!(transition.to, TestState::Initial);
        assert!(transition.event.is_anonymous());
        assert!(transition.guard.is_always());
        assert!(transition.action.is_none());
    }

    #[test]
    fn fluent_api_builds_transition() {
        let transition = TransitionBuilder::new()
            .from(TestState::Initial)
            .on::<Submit>()
            .when(|quota: &Quota| quota.0 > 0)
            .to(TestState::Processing)
            .build()
            .unwrap();

        assert_eq!(transition.from, TestState::Initial);
        assert_eq!(transition.to, TestState::Processing);
        assert_eq!(transition.event, EventTag::of::<Submit>());
        assert_eq!(transition.deps(), &[TypeKey::of::<Quota>()]);
    }

    #[test]
    fn then_appends_in_order() {
        let transition = TransitionBuilder::new()
            .from(TestState::Initial)
            .then(audit)
            .then(notify)
            .build()
            .unwrap();

        assert_eq!(transition.action.name(), "(audit, notify)");
    }

    #[test]
    fn action_replaces_previous_action() {
        let transition = TransitionBuilder::new()
            .from(TestState::Initial)
            .then(audit)
            .action(notify)
            .build()
            .unwrap();

        assert_eq!(transition.action.name(), "notify");
    }
}
