//! Guard predicates and their boolean algebra.
//!
//! A guard is any closure or function returning `bool` whose parameters are
//! shared references to resolvable types (see [`Context`]). Guards combine
//! with `&`, `|` and `!`, which, like the same operators on `bool`, always
//! evaluate every operand.

use crate::core::context::{dependency_keys, Context};
use crate::core::deps::TypeKey;
use crate::core::event::short_type_name;
use crate::core::State;
use std::any::{type_name, Any};
use std::borrow::Cow;
use std::fmt;
use std::ops::{BitAnd, BitOr, Not};
use std::sync::Arc;

type Predicate<S> = Arc<dyn Fn(&Context<'_, S>) -> bool + Send + Sync>;

/// Predicate that determines if a transition can fire.
///
/// # Example
///
/// ```rust
/// use tabula::core::{Guard, State};
/// use tabula::engine::StateMachine;
///
/// #[derive(Clone, PartialEq, Debug)]
/// enum Door {
///     Open,
///     Closed,
/// }
///
/// impl State for Door {
///     fn name(&self) -> &str {
///         match self {
///             Self::Open => "Open",
///             Self::Closed => "Closed",
///         }
///     }
/// }
///
/// struct Locked(bool);
///
/// let unlocked = !Guard::<Door>::new(|lock: &Locked| lock.0);
/// let from_closed = Guard::<Door>::new(|m: &StateMachine<Door>| m.is(&Door::Closed));
/// let can_open = unlocked & from_closed;
///
/// // The machine itself is always resolvable, so only `Locked` is required.
/// assert_eq!(can_open.requires().len(), 1);
/// ```
pub struct Guard<S: State> {
    name: Cow<'static, str>,
    requires: Vec<TypeKey>,
    predicate: Predicate<S>,
    always: bool,
}

impl<S: State> Guard<S> {
    /// Create a guard from a closure or function.
    pub fn new<M>(predicate: impl IntoGuard<S, M>) -> Self {
        predicate.into_guard()
    }

    /// The default guard: constant `true`, no requirements.
    pub fn always() -> Self {
        Self {
            name: Cow::Borrowed("always"),
            requires: Vec::new(),
            predicate: Arc::new(|_: &Context<'_, S>| true),
            always: true,
        }
    }

    /// Build a guard directly over a [`Context`].
    ///
    /// `requires` lists every parameter type the predicate resolves; the
    /// machine checks them when it is built.
    pub fn from_context<F>(name: impl Into<Cow<'static, str>>, requires: Vec<TypeKey>, f: F) -> Self
    where
        F: Fn(&Context<'_, S>) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            requires,
            predicate: Arc::new(f),
            always: false,
        }
    }

    /// Replace the display name used by introspection.
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameter types this guard (and every nested guard) resolves, apart
    /// from the machine itself.
    pub fn requires(&self) -> &[TypeKey] {
        &self.requires
    }

    /// Whether this is the default always-true guard.
    pub fn is_always(&self) -> bool {
        self.always
    }

    /// Evaluate the guard, resolving its arguments from `ctx`.
    pub fn check(&self, ctx: &Context<'_, S>) -> bool {
        (self.predicate)(ctx)
    }

    /// Conjunction evaluating both operands.
    pub fn and<M>(self, other: impl IntoGuard<S, M>) -> Self {
        and(self, other)
    }

    /// Disjunction evaluating both operands.
    pub fn or<M>(self, other: impl IntoGuard<S, M>) -> Self {
        or(self, other)
    }
}

impl<S: State> Clone for Guard<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            requires: self.requires.clone(),
            predicate: Arc::clone(&self.predicate),
            always: self.always,
        }
    }
}

impl<S: State> Default for Guard<S> {
    fn default() -> Self {
        Self::always()
    }
}

impl<S: State> fmt::Debug for Guard<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard")
            .field("name", &self.name)
            .field("requires", &self.requires)
            .finish()
    }
}

/// Conjunction of two guards. Both operands are always evaluated.
pub fn and<S: State, M1, M2>(lhs: impl IntoGuard<S, M1>, rhs: impl IntoGuard<S, M2>) -> Guard<S> {
    let (lhs, rhs) = (lhs.into_guard(), rhs.into_guard());
    let name = format!("{} && {}", lhs.name, rhs.name);
    let requires = union(&lhs.requires, &rhs.requires);
    Guard::from_context(name, requires, move |ctx| {
        let left = lhs.check(ctx);
        let right = rhs.check(ctx);
        left & right
    })
}

/// Disjunction of two guards. Both operands are always evaluated.
pub fn or<S: State, M1, M2>(lhs: impl IntoGuard<S, M1>, rhs: impl IntoGuard<S, M2>) -> Guard<S> {
    let (lhs, rhs) = (lhs.into_guard(), rhs.into_guard());
    let name = format!("{} || {}", lhs.name, rhs.name);
    let requires = union(&lhs.requires, &rhs.requires);
    Guard::from_context(name, requires, move |ctx| {
        let left = lhs.check(ctx);
        let right = rhs.check(ctx);
        left | right
    })
}

/// Negation of a guard.
pub fn not<S: State, M>(guard: impl IntoGuard<S, M>) -> Guard<S> {
    let guard = guard.into_guard();
    let name = format!("!{}", guard.name);
    let requires = guard.requires.clone();
    Guard::from_context(name, requires, move |ctx| !guard.check(ctx))
}

impl<S: State> BitAnd for Guard<S> {
    type Output = Guard<S>;

    fn bitand(self, rhs: Self) -> Self::Output {
        and(self, rhs)
    }
}

impl<S: State> BitOr for Guard<S> {
    type Output = Guard<S>;

    fn bitor(self, rhs: Self) -> Self::Output {
        or(self, rhs)
    }
}

impl<S: State> Not for Guard<S> {
    type Output = Guard<S>;

    fn not(self) -> Self::Output {
        not(self)
    }
}

/// Merge two requirement lists, dropping duplicates.
pub(crate) fn union(lhs: &[TypeKey], rhs: &[TypeKey]) -> Vec<TypeKey> {
    let mut merged = lhs.to_vec();
    for key in rhs {
        if !merged.contains(key) {
            merged.push(*key);
        }
    }
    merged
}

/// Conversion into a [`Guard`].
///
/// Implemented for guards themselves and for every `Fn(&P0, .., &Pn) -> bool`
/// with up to six parameters. `Marker` only disambiguates the impls.
pub trait IntoGuard<S: State, Marker>: Sized {
    fn into_guard(self) -> Guard<S>;
}

impl<S: State> IntoGuard<S, Guard<S>> for Guard<S> {
    fn into_guard(self) -> Guard<S> {
        self
    }
}

macro_rules! impl_into_guard {
    ($($param:ident),*) => {
        impl<S, F, $($param),*> IntoGuard<S, fn($(&$param),*) -> bool> for F
        where
            S: State,
            F: Fn($(&$param),*) -> bool + Send + Sync + 'static,
            $($param: Any,)*
        {
            #[allow(unused_variables)]
            fn into_guard(self) -> Guard<S> {
                Guard::from_context(
                    short_type_name(type_name::<F>()),
                    dependency_keys::<S>(vec![$(TypeKey::of::<$param>()),*]),
                    move |ctx: &Context<'_, S>| (self)($(ctx.resolve::<$param>()),*),
                )
            }
        }
    };
}

impl_into_guard!();
impl_into_guard!(P0);
impl_into_guard!(P0, P1);
impl_into_guard!(P0, P1, P2);
impl_into_guard!(P0, P1, P2, P3);
impl_into_guard!(P0, P1, P2, P3, P4);
impl_into_guard!(P0, P1, P2, P3, P4, P5);
