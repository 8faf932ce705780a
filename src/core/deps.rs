//! Type-indexed dependency pool.
//!
//! Guards and actions request values by parameter type. Everything that is not
//! the dispatched event or the machine itself comes from this pool, which is
//! filled once when the machine is constructed.

use crate::builder::BuildError;
use crate::core::event::short_type_name;
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;

/// Identity of a parameter type requested by a guard or action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn short_name(&self) -> &'static str {
        short_type_name(self.name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Fixed pool holding at most one value per type.
///
/// # Example
///
/// ```rust
/// use tabula::core::Dependencies;
/// use std::sync::atomic::AtomicUsize;
///
/// let deps = Dependencies::new()
///     .with(AtomicUsize::new(0))
///     .and_then(|deps| deps.with(String::from("link-0")))
///     .unwrap();
///
/// assert_eq!(deps.len(), 2);
/// assert_eq!(deps.get::<String>().map(String::as_str), Some("link-0"));
/// ```
#[derive(Default)]
pub struct Dependencies {
    values: HashMap<TypeId, (TypeKey, Box<dyn Any + Send>)>,
}

impl Dependencies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value; fails if a value of the same type is already present.
    pub fn insert<T: Any + Send>(&mut self, value: T) -> Result<(), BuildError> {
        let key = TypeKey::of::<T>();
        if self.values.contains_key(&key.id()) {
            return Err(BuildError::DuplicateDependency {
                type_name: key.name(),
            });
        }
        self.values.insert(key.id(), (key, Box::new(value)));
        Ok(())
    }

    /// Consuming form of [`insert`](Self::insert) for chaining.
    pub fn with<T: Any + Send>(mut self, value: T) -> Result<Self, BuildError> {
        self.insert(value)?;
        Ok(self)
    }

    /// Move every value of `other` into this pool.
    ///
    /// Either every value moves or, on a type clash, none does.
    pub fn merge(&mut self, other: Dependencies) -> Result<(), BuildError> {
        if let Some(key) = other.keys().find(|key| self.contains(key)) {
            return Err(BuildError::DuplicateDependency {
                type_name: key.name(),
            });
        }
        self.values.extend(other.values);
        Ok(())
    }

    pub fn get<T: Any>(&self) -> Option<&T> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|(_, value)| value.downcast_ref::<T>())
    }

    pub fn contains(&self, key: &TypeKey) -> bool {
        self.values.contains_key(&key.id())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Keys of every stored value, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &TypeKey> + '_ {
        self.values.values().map(|(key, _)| key)
    }
}

impl fmt::Debug for Dependencies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.keys().map(|key| key.name()))
            .finish()
    }
}

/// Anything that can populate a [`Dependencies`] pool.
///
/// Implemented for `()`, for tuples of up to eight values and for a prepared
/// pool. A tuple holding two values of the same type is rejected with
/// [`BuildError::DuplicateDependency`].
pub trait IntoDependencies {
    fn into_dependencies(self) -> Result<Dependencies, BuildError>;
}

impl IntoDependencies for Dependencies {
    fn into_dependencies(self) -> Result<Dependencies, BuildError> {
        Ok(self)
    }
}

impl IntoDependencies for () {
    fn into_dependencies(self) -> Result<Dependencies, BuildError> {
        Ok(Dependencies::new())
    }
}

macro_rules! impl_into_dependencies {
    ($($value:ident),+) => {
        impl<$($value: Any + Send),+> IntoDependencies for ($($value,)+) {
            #[allow(non_snake_case)]
            fn into_dependencies(self) -> Result<Dependencies, BuildError> {
                let ($($value,)+) = self;
                let mut deps = Dependencies::new();
                $(deps.insert($value)?;)+
                Ok(deps)
            }
        }
    };
}

impl_into_dependencies!(T0);
impl_into_dependencies!(T0, T1);
impl_into_dependencies!(T0, T1, T2);
impl_into_dependencies!(T0, T1, T2, T3);
impl_into_dependencies!(T0, T1, T2, T3, T4);
impl_into_dependencies!(T0, T1, T2, T3, T4, T5);
impl_into_dependencies!(T0, T1, T2, T3, T4, T5, T6);
impl_into_dependencies!(T0, T1, T2, T3, T4, T5, T6, T7);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug, PartialEq)]
    struct Threshold(u32);

    #[test]
    fn lookup_is_by_exact_type() {
        let deps = (Threshold(7), String::from("x")).into_dependencies().unwrap();

        assert_eq!(deps.get::<Threshold>(), Some(&Threshold(7)));
        assert_eq!(deps.get::<String>().map(String::as_str), Some("x"));
        assert!(deps.get::<u32>().is_none());
    }

    #[test]
    fn duplicate_types_are_rejected() {
        let result = (Threshold(1), Threshold(2)).into_dependencies();

        assert!(matches!(
            result,
            Err(BuildError::DuplicateDependency { type_name }) if type_name.ends_with("Threshold")
        ));
    }

    #[test]
    fn insert_reports_duplicate() {
        let mut deps = Dependencies::new();
        deps.insert(1u8).unwrap();

        assert!(deps.insert(2u8).is_err());
        assert_eq!(deps.get::<u8>(), Some(&1));
    }

    #[test]
    fn stored_value_is_the_supplied_instance() {
        let counter = Arc::new(AtomicUsize::new(0));
        let deps = (Arc::clone(&counter),).into_dependencies().unwrap();

        let stored = deps.get::<Arc<AtomicUsize>>().unwrap();
        stored.fetch_add(3, Ordering::SeqCst);

        assert!(Arc::ptr_eq(stored, &counter));
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn unit_yields_empty_pool() {
        let deps = ().into_dependencies().unwrap();
        assert!(deps.is_empty());
        assert!(!deps.contains(&TypeKey::of::<Threshold>()));
    }

    #[test]
    fn merge_rejects_overlapping_pools() {
        let mut deps = (Threshold(1),).into_dependencies().unwrap();
        deps.merge((String::from("a"),).into_dependencies().unwrap())
            .unwrap();
        assert_eq!(deps.len(), 2);

        let overlap = (1u16, 2u32, 3u64, Threshold(2), 4i8, 5i16)
            .into_dependencies()
            .unwrap();
        assert!(deps.merge(overlap).is_err());
        assert_eq!(deps.len(), 2);
        assert_eq!(deps.get::<Threshold>(), Some(&Threshold(1)));
        assert!(deps.get::<u16>().is_none());
        assert!(deps.get::<i16>().is_none());
    }
}
