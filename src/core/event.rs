//! Event tags and the reserved pseudo-events.
//!
//! Any `'static` value can be dispatched as an event. Its tag is its type:
//! two events share a tag exactly when they have the same Rust type.

use std::any::{type_name, TypeId};
use std::fmt;

/// Tag of event-less transitions. Dispatched by `StateMachine::start`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Anonymous;

/// Pseudo-event conventionally used for "on entry" hooks.
///
/// The engine never dispatches it on its own; see the crate docs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct OnEntry;

/// Pseudo-event conventionally used for "on exit" hooks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct OnExit;

/// Identity of an event type plus its display name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EventTag {
    id: TypeId,
    name: &'static str,
}

impl EventTag {
    /// Tag for event type `E`.
    pub fn of<E: 'static>() -> Self {
        Self {
            id: TypeId::of::<E>(),
            name: short_type_name(type_name::<E>()),
        }
    }

    pub fn anonymous() -> Self {
        Self::of::<Anonymous>()
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_anonymous(&self) -> bool {
        self.id == TypeId::of::<Anonymous>()
    }

    pub fn is_entry(&self) -> bool {
        self.id == TypeId::of::<OnEntry>()
    }

    pub fn is_exit(&self) -> bool {
        self.id == TypeId::of::<OnExit>()
    }
}

impl fmt::Display for EventTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Strip the module path from a type name, keeping any generic arguments.
///
/// `a::b::Ping` becomes `Ping` and `a::Frame<b::Ack>` becomes `Frame<b::Ack>`.
pub(crate) fn short_type_name(full: &'static str) -> &'static str {
    let head_end = full.find('<').unwrap_or(full.len());
    let start = full[..head_end].rfind("::").map_or(0, |i| i + 2);
    &full[start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ping;
    #[allow(dead_code)]
    struct Frame<T>(T);

    #[test]
    fn tags_are_equal_per_type() {
        assert_eq!(EventTag::of::<Ping>(), EventTag::of::<Ping>());
        assert_ne!(EventTag::of::<Ping>(), EventTag::of::<Anonymous>());
    }

    #[test]
    fn reserved_tags_are_recognised() {
        assert!(EventTag::anonymous().is_anonymous());
        assert!(EventTag::of::<OnEntry>().is_entry());
        assert!(EventTag::of::<OnExit>().is_exit());
        assert!(!EventTag::of::<Ping>().is_entry());
    }

    #[test]
    fn names_drop_module_path() {
        assert_eq!(EventTag::of::<Ping>().name(), "Ping");
        assert_eq!(EventTag::of::<Anonymous>().name(), "Anonymous");
        assert_eq!(short_type_name("Plain"), "Plain");
    }

    #[test]
    fn names_keep_generic_arguments() {
        assert_eq!(short_type_name("a::b::Frame<c::Ack>"), "Frame<c::Ack>");
        assert!(EventTag::of::<Frame<Ping>>().name().starts_with("Frame<"));
    }
}
