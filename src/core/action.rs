//! Transition actions and sequential composition.

use crate::core::context::{dependency_keys, Context};
use crate::core::deps::TypeKey;
use crate::core::event::short_type_name;
use crate::core::guard::union;
use crate::core::State;
use std::any::{type_name, Any};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

type Procedure<S> = Arc<dyn Fn(&Context<'_, S>) + Send + Sync>;

/// Side effect run when a transition fires.
///
/// Parameters are resolved exactly like guard parameters. Pool values are
/// shared, so actions that need to mutate them go through interior
/// mutability (`Cell`, atomics, `Mutex`).
///
/// # Example
///
/// ```rust
/// use tabula::core::{Action, State};
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// #[derive(Clone, PartialEq, Debug)]
/// enum Phase {
///     Only,
/// }
///
/// impl State for Phase {
///     fn name(&self) -> &str {
///         "Only"
///     }
/// }
///
/// struct Sent(AtomicUsize);
/// struct Acked(AtomicUsize);
///
/// let send = Action::<Phase>::new(|sent: &Sent| {
///     sent.0.fetch_add(1, Ordering::Relaxed);
/// });
/// let ack = Action::<Phase>::new(|acked: &Acked| {
///     acked.0.fetch_add(1, Ordering::Relaxed);
/// });
///
/// let both = send.then(ack);
/// assert_eq!(both.requires().len(), 2);
/// ```
pub struct Action<S: State> {
    name: Cow<'static, str>,
    requires: Vec<TypeKey>,
    procedure: Procedure<S>,
    none: bool,
}

impl<S: State> Action<S> {
    /// Create an action from a closure or function.
    pub fn new<M>(action: impl IntoAction<S, M>) -> Self {
        action.into_action()
    }

    /// The default action: does nothing, requires nothing.
    pub fn none() -> Self {
        Self {
            name: Cow::Borrowed("none"),
            requires: Vec::new(),
            procedure: Arc::new(|_: &Context<'_, S>| {}),
            none: true,
        }
    }

    /// Build an action directly over a [`Context`].
    pub fn from_context<F>(name: impl Into<Cow<'static, str>>, requires: Vec<TypeKey>, f: F) -> Self
    where
        F: Fn(&Context<'_, S>) + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            requires,
            procedure: Arc::new(f),
            none: false,
        }
    }

    /// Run every action of `actions` in order.
    pub fn sequence<I>(actions: I) -> Self
    where
        I: IntoIterator<Item = Action<S>>,
    {
        let actions: Vec<Action<S>> = actions.into_iter().collect();
        let name = actions
            .iter()
            .map(|action| action.name())
            .collect::<Vec<_>>()
            .join(", ");
        let requires = actions
            .iter()
            .fold(Vec::new(), |acc, action| union(&acc, &action.requires));
        Self::from_context(format!("({name})"), requires, move |ctx| {
            for action in &actions {
                action.run(ctx);
            }
        })
    }

    /// Replace the display name used by introspection.
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameter types this action (and every nested action) resolves, apart
    /// from the machine itself.
    pub fn requires(&self) -> &[TypeKey] {
        &self.requires
    }

    /// Whether this is the default no-op action.
    pub fn is_none(&self) -> bool {
        self.none
    }

    /// Execute the action, resolving its arguments from `ctx`.
    pub fn run(&self, ctx: &Context<'_, S>) {
        (self.procedure)(ctx)
    }

    /// Run `self`, then `next`.
    pub fn then<M>(self, next: impl IntoAction<S, M>) -> Self {
        seq(self, next)
    }
}

impl<S: State> Clone for Action<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            requires: self.requires.clone(),
            procedure: Arc::clone(&self.procedure),
            none: self.none,
        }
    }
}

impl<S: State> Default for Action<S> {
    fn default() -> Self {
        Self::none()
    }
}

impl<S: State> fmt::Debug for Action<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("name", &self.name)
            .field("requires", &self.requires)
            .finish()
    }
}

/// Sequential composition: `first` then `second`, unconditionally.
pub fn seq<S: State, M1, M2>(first: impl IntoAction<S, M1>, second: impl IntoAction<S, M2>) -> Action<S> {
    Action::sequence([first.into_action(), second.into_action()])
}

/// Action that dispatches `event` on the machine running it.
///
/// The event is dispatched after the current transition has committed its
/// destination (nested dispatches are deferred, see
/// [`StateMachine::dispatch`](crate::engine::StateMachine::dispatch)).
pub fn process_event<S, E>(event: E) -> Action<S>
where
    S: State,
    E: Clone + Send + Sync + 'static,
{
    let name = format!("process_event<{}>", short_type_name(type_name::<E>()));
    Action::from_context(name, Vec::new(), move |ctx| {
        ctx.machine().process_event(event.clone());
    })
}

/// Conversion into an [`Action`].
///
/// Implemented for actions themselves and for every `Fn(&P0, .., &Pn)` with up
/// to six parameters.
pub trait IntoAction<S: State, Marker>: Sized {
    fn into_action(self) -> Action<S>;
}

impl<S: State> IntoAction<S, Action<S>> for Action<S> {
    fn into_action(self) -> Action<S> {
        self
    }
}

macro_rules! impl_into_action {
    ($($param:ident),*) => {
        impl<S, F, $($param),*> IntoAction<S, fn($(&$param),*)> for F
        where
            S: State,
            F: Fn($(&$param),*) + Send + Sync + 'static,
            $($param: Any,)*
        {
            #[allow(unused_variables)]
            fn into_action(self) -> Action<S> {
                Action::from_context(
                    short_type_name(type_name::<F>()),
                    dependency_keys::<S>(vec![$(TypeKey::of::<$param>()),*]),
                    move |ctx: &Context<'_, S>| (self)($(ctx.resolve::<$param>()),*),
                )
            }
        }
    };
}

impl_into_action!();
impl_into_action!(P0);
impl_into_action!(P0, P1);
impl_into_action!(P0, P1, P2);
impl_into_action!(P0, P1, P2, P3);
impl_into_action!(P0, P1, P2, P3, P4);
impl_into_action!(P0, P1, P2, P3, P4, P5);
