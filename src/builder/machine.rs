//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::builder::transition::TransitionBuilder;
use crate::core::{Dependencies, IntoDependencies, State};
use crate::engine::{StateMachine, Transition};
use std::any::Any;

/// A reusable machine definition: initial state plus transition table.
///
/// Implement it on a plain type to declare a topology once and instantiate
/// it with different dependency pools through [`StateMachine::new`].
pub trait Configure {
    type State: State;

    fn initial(&self) -> Self::State;

    fn transitions(&self) -> Vec<TransitionBuilder<Self::State>>;
}

/// Builder for constructing state machines with a fluent API.
pub struct StateMachineBuilder<S: State> {
    initial: Option<S>,
    transitions: Vec<Transition<S>>,
    deps: Dependencies,
}

impl<S: State> StateMachineBuilder<S> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            initial: None,
            transitions: Vec::new(),
            deps: Dependencies::new(),
        }
    }

    /// Start from a [`Configure`] definition.
    pub fn configure<C>(config: &C) -> Result<Self, BuildError>
    where
        C: Configure<State = S>,
    {
        config
            .transitions()
            .into_iter()
            .try_fold(Self::new().initial(config.initial()), Self::transition)
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    /// Add a transition using a builder.
    /// Returns an error if the builder fails validation.
    pub fn transition(mut self, builder: TransitionBuilder<S>) -> Result<Self, BuildError> {
        let transition = builder.build()?;
        self.transitions.push(transition);
        Ok(self)
    }

    /// Add a pre-built transition.
    pub fn add_transition(mut self, transition: Transition<S>) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Add multiple transitions at once.
    pub fn transitions(mut self, transitions: Vec<Transition<S>>) -> Self {
        self.transitions.extend(transitions);
        self
    }

    /// Add one value to the dependency pool.
    pub fn dependency<T: Any + Send>(mut self, value: T) -> Result<Self, BuildError> {
        self.deps.insert(value)?;
        Ok(self)
    }

    /// Add a tuple (or prepared pool) of values to the dependency pool.
    pub fn dependencies(mut self, deps: impl IntoDependencies) -> Result<Self, BuildError> {
        self.deps.merge(deps.into_dependencies()?)?;
        Ok(self)
    }

    /// Build the state machine.
    ///
    /// Returns an error if required fields are missing or if a transition
    /// needs a dependency the pool does not hold.
    pub fn build(self) -> Result<StateMachine<S>, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;
        StateMachine::compile(initial, self.transitions, self.deps)
    }
}

impl<S: State> Default for StateMachineBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}
