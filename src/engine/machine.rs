//! Dispatch engine.

use crate::builder::{BuildError, Configure, StateMachineBuilder};
use crate::core::{Anonymous, Context, Dependencies, EventTag, IntoDependencies, State};
use crate::engine::partition::PartitionTable;
use crate::engine::registry::{Registry, StateId};
use crate::engine::transition::Transition;
use std::any::{Any, TypeId};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use tracing::{debug, trace};

/// Result of dispatching one event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// A transition fired; the current state is its destination.
    Handled,

    /// No transition for (state, event), or every guard failed. State unchanged.
    Unhandled,

    /// Dispatched from inside a guard or action of the same machine; queued
    /// until the running dispatch has committed its transition.
    Deferred,
}

impl Outcome {
    pub fn is_handled(self) -> bool {
        matches!(self, Self::Handled)
    }
}

type DeferredEvent<S> = Box<dyn FnOnce(&StateMachine<S>) + Send>;

/// A compiled transition table plus its single piece of mutable state, the
/// current state id.
///
/// Dispatch takes `&self`: guards and actions may receive the machine as a
/// parameter and query it while it runs. The machine is `Send` but not
/// `Sync`; callers sharing it across threads must serialize access.
pub struct StateMachine<S: State> {
    registry: Registry<S>,
    partitions: PartitionTable,
    transitions: Vec<Transition<S>>,
    deps: Dependencies,
    initial: StateId,
    sinks: Vec<bool>,
    current: Cell<StateId>,
    dispatching: Cell<bool>,
    deferred: RefCell<VecDeque<DeferredEvent<S>>>,
}

impl<S: State> StateMachine<S> {
    /// Compile `config` and bind `deps` into the pool.
    ///
    /// Fails if a guard or action asks for a type the pool does not hold, or
    /// if `deps` holds two values of one type.
    pub fn new<C, D>(config: C, deps: D) -> Result<Self, BuildError>
    where
        C: Configure<State = S>,
        D: IntoDependencies,
    {
        StateMachineBuilder::configure(&config)?
            .dependencies(deps)?
            .build()
    }

    pub(crate) fn compile(
        initial: S,
        transitions: Vec<Transition<S>>,
        deps: Dependencies,
    ) -> Result<Self, BuildError> {
        if transitions.is_empty() {
            return Err(BuildError::NoTransitions);
        }

        for transition in &transitions {
            if let Some(missing) = transition.deps().iter().find(|key| !deps.contains(key)) {
                return Err(BuildError::UnresolvedDependency {
                    type_name: missing.name(),
                    transition: describe(transition),
                });
            }
        }

        let registry = Registry::build(&transitions);
        let initial = registry
            .state_id(&initial)
            .ok_or_else(|| BuildError::UnknownInitialState {
                state: format!("{initial:?}"),
            })?;
        let partitions = PartitionTable::build(&registry, &transitions);
        let sinks = registry
            .states()
            .iter()
            .map(|state| {
                transitions
                    .iter()
                    .filter(|t| !is_hook(t))
                    .all(|t| t.from != *state)
            })
            .collect();

        debug!(
            states = registry.states().len(),
            events = registry.events().len(),
            transitions = transitions.len(),
            dependencies = deps.len(),
            initial = registry.state(initial).name(),
            "compiled state machine"
        );

        Ok(Self {
            registry,
            partitions,
            transitions,
            deps,
            initial,
            sinks,
            current: Cell::new(initial),
            dispatching: Cell::new(false),
            deferred: RefCell::new(VecDeque::new()),
        })
    }

    /// Fire the anonymous transition of the current (initial) state, if any.
    pub fn start(&self) -> bool {
        debug!(state = self.current_state().name(), "starting state machine");
        self.process_event(Anonymous)
    }

    /// Lifecycle hook; the engine holds no resources to release.
    pub fn stop(&self) {
        debug!(state = self.current_state().name(), "stopping state machine");
    }

    /// Dispatch `event`; `true` when a transition fired.
    pub fn process_event<E: Any + Send>(&self, event: E) -> bool {
        self.dispatch(event).is_handled()
    }

    /// Dispatch `event` and report the outcome.
    ///
    /// The candidates for (current state, event type) are tried in
    /// declaration order. Each guard is evaluated once until one passes; its
    /// action runs and the current state becomes its destination.
    ///
    /// A dispatch issued from inside a guard or action of this machine is
    /// queued and returns [`Outcome::Deferred`]. Queued events run in FIFO
    /// order once the outer transition is complete.
    pub fn dispatch<E: Any + Send>(&self, event: E) -> Outcome {
        if self.dispatching.get() {
            debug!(event = EventTag::of::<E>().name(), "deferring re-entrant event");
            self.deferred
                .borrow_mut()
                .push_back(Box::new(move |machine: &Self| {
                    machine.dispatch_now(&event);
                }));
            return Outcome::Deferred;
        }

        let _running = Running::enter(&self.dispatching, &self.deferred);
        let outcome = self.dispatch_now(&event);
        self.drain_deferred();
        outcome
    }

    fn dispatch_now<E: Any>(&self, event: &E) -> Outcome {
        let Some(event_id) = self.registry.event_id(TypeId::of::<E>()) else {
            return Outcome::Unhandled;
        };
        let source = self.current.get();
        let ctx = Context::new(event, self);

        for candidate in self.partitions.candidates(event_id, source) {
            let transition = &self.transitions[candidate.transition];
            if transition.execute(&ctx) {
                self.current.set(candidate.destination);
                trace!(
                    from = self.registry.state(source).name(),
                    to = self.registry.state(candidate.destination).name(),
                    event = transition.event.name(),
                    "transition"
                );
                return Outcome::Handled;
            }
        }
        Outcome::Unhandled
    }

    fn drain_deferred(&self) {
        loop {
            let next = self.deferred.borrow_mut().pop_front();
            match next {
                Some(deferred) => deferred(self),
                None => break,
            }
        }
    }

    /// Get current state (pure)
    pub fn current_state(&self) -> &S {
        self.registry.state(self.current.get())
    }

    pub fn state_id(&self) -> StateId {
        self.current.get()
    }

    pub fn initial_state(&self) -> &S {
        self.registry.state(self.initial)
    }

    /// Whether the machine currently is in `state`.
    pub fn is(&self, state: &S) -> bool {
        self.current_state() == state
    }

    /// Whether the machine currently is in any of `states`.
    pub fn is_any(&self, states: &[S]) -> bool {
        states.contains(self.current_state())
    }

    /// Whether the current state is marked terminal or has no outgoing
    /// transitions.
    ///
    /// `OnEntry`/`OnExit` rows that loop on their own state are hooks, not
    /// edges, and do not keep a state from being a sink.
    pub fn is_terminal(&self) -> bool {
        let current = self.current.get();
        self.sinks[current.0] || self.current_state().is_terminal()
    }

    pub fn dependencies(&self) -> &Dependencies {
        &self.deps
    }

    pub fn registry(&self) -> &Registry<S> {
        &self.registry
    }

    pub(crate) fn table(&self) -> &[Transition<S>] {
        &self.transitions
    }

    pub(crate) fn initial_id(&self) -> StateId {
        self.initial
    }
}

impl<S: State> std::fmt::Debug for StateMachine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateMachine")
            .field("current", self.current_state())
            .field("states", &self.registry.states().len())
            .field("transitions", &self.transitions.len())
            .field("dependencies", &self.deps)
            .finish()
    }
}

/// Marks a dispatch in progress. Cleared on drop; when the drop is caused by
/// a panicking guard or action, events it queued are discarded as well.
struct Running<'a, S: State> {
    flag: &'a Cell<bool>,
    deferred: &'a RefCell<VecDeque<DeferredEvent<S>>>,
}

impl<'a, S: State> Running<'a, S> {
    fn enter(flag: &'a Cell<bool>, deferred: &'a RefCell<VecDeque<DeferredEvent<S>>>) -> Self {
        flag.set(true);
        Self { flag, deferred }
    }
}

impl<S: State> Drop for Running<'_, S> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            if let Ok(mut deferred) = self.deferred.try_borrow_mut() {
                deferred.clear();
            }
        }
        self.flag.set(false);
    }
}

fn is_hook<S: State>(transition: &Transition<S>) -> bool {
    (transition.event.is_entry() || transition.event.is_exit()) && transition.is_self_loop()
}

fn describe<S: State>(transition: &Transition<S>) -> String {
    format!(
        "{} + {} = {}",
        transition.from.name(),
        transition.event.name(),
        transition.to.name()
    )
}
