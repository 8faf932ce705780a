//! Dense ids for the states and events of a transition table.

use crate::core::{EventTag, State};
use crate::engine::transition::Transition;
use serde::Serialize;
use std::any::TypeId;
use std::collections::HashMap;

/// Index of a state in the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct StateId(pub(crate) usize);

impl StateId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Index of an event tag in the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EventId(pub(crate) usize);

impl EventId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// States and events of a table, numbered in first-seen order.
#[derive(Debug)]
pub struct Registry<S: State> {
    states: Vec<S>,
    events: Vec<EventTag>,
    event_ids: HashMap<TypeId, EventId>,
}

impl<S: State> Registry<S> {
    /// Walk the table once. For each transition the source is registered
    /// before the destination.
    pub fn build(transitions: &[Transition<S>]) -> Self {
        let mut registry = Self {
            states: Vec::new(),
            events: Vec::new(),
            event_ids: HashMap::new(),
        };
        for transition in transitions {
            registry.register_state(&transition.from);
            registry.register_state(&transition.to);
            registry.register_event(transition.event);
        }
        registry
    }

    fn register_state(&mut self, state: &S) -> StateId {
        match self.state_id(state) {
            Some(id) => id,
            None => {
                self.states.push(state.clone());
                StateId(self.states.len() - 1)
            }
        }
    }

    fn register_event(&mut self, tag: EventTag) -> EventId {
        let next = EventId(self.events.len());
        let id = *self.event_ids.entry(tag.id()).or_insert(next);
        if id == next {
            self.events.push(tag);
        }
        id
    }

    pub fn state_id(&self, state: &S) -> Option<StateId> {
        self.states.iter().position(|s| s == state).map(StateId)
    }

    /// O(1) lookup used on every dispatch.
    pub fn event_id(&self, tag: TypeId) -> Option<EventId> {
        self.event_ids.get(&tag).copied()
    }

    pub fn state(&self, id: StateId) -> &S {
        &self.states[id.0]
    }

    pub fn event(&self, id: EventId) -> &EventTag {
        &self.events[id.0]
    }

    pub fn states(&self) -> &[S] {
        &self.states
    }

    pub fn events(&self) -> &[EventTag] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Action, Anonymous, Guard};

    #[derive(Clone, PartialEq, Debug)]
    enum TestState {
        A,
        B,
        C,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::A => "A",
                Self::B => "B",
                Self::C => "C",
            }
        }
    }

    struct Go;
    struct Stop;

    fn row(from: TestState, to: TestState, event: EventTag) -> Transition<TestState> {
        Transition::new(from, to, event, Guard::always(), Action::none())
    }

    #[test]
    fn ids_follow_first_seen_order() {
        let table = vec![
            row(TestState::B, TestState::C, EventTag::of::<Go>()),
            row(TestState::C, TestState::A, EventTag::of::<Stop>()),
            row(TestState::A, TestState::B, EventTag::of::<Go>()),
        ];

        let registry = Registry::build(&table);

        assert_eq!(
            registry.states(),
            &[TestState::B, TestState::C, TestState::A]
        );
        assert_eq!(registry.state_id(&TestState::A), Some(StateId(2)));
        assert_eq!(registry.events().len(), 2);
        assert_eq!(registry.event_id(TypeId::of::<Go>()), Some(EventId(0)));
        assert_eq!(registry.event_id(TypeId::of::<Stop>()), Some(EventId(1)));
    }

    #[test]
    fn reserved_tags_are_registered_only_when_used() {
        let table = vec![row(TestState::A, TestState::B, EventTag::of::<Go>())];
        let registry = Registry::build(&table);
        assert!(registry.event_id(TypeId::of::<Anonymous>()).is_none());

        let table = vec![row(TestState::A, TestState::B, EventTag::anonymous())];
        let registry = Registry::build(&table);
        assert_eq!(registry.event_id(TypeId::of::<Anonymous>()), Some(EventId(0)));
    }

    #[test]
    fn ids_are_dense() {
        let table = vec![
            row(TestState::A, TestState::A, EventTag::of::<Go>()),
            row(TestState::A, TestState::B, EventTag::of::<Go>()),
        ];

        let registry = Registry::build(&table);

        assert_eq!(registry.states().len(), 2);
        assert_eq!(registry.state(StateId(1)), &TestState::B);
        assert!(registry.state_id(&TestState::C).is_none());
    }
}
