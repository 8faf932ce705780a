//! Read-only view of a compiled table for diagram tools.
//!
//! The view renders nothing itself. A PlantUML exporter, for example, walks
//! [`StateMachine::transitions`] and prints one line per record.

use crate::core::{EventTag, State};
use crate::engine::machine::StateMachine;
use crate::engine::transition::Transition;
use serde::Serialize;
use std::iter::FusedIterator;

/// Destination of a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint<'a> {
    State(&'a str),
    /// The destination is marked terminal; diagram tools draw a sink.
    Terminal,
}

/// Event a transition reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventLabel<'a> {
    /// Event-less transition.
    Anonymous,
    Entry,
    Exit,
    Named(&'a str),
}

impl<'a> EventLabel<'a> {
    fn of(tag: &'a EventTag) -> Self {
        if tag.is_anonymous() {
            Self::Anonymous
        } else if tag.is_entry() {
            Self::Entry
        } else if tag.is_exit() {
            Self::Exit
        } else {
            Self::Named(tag.name())
        }
    }

    /// Text to print, `None` for anonymous transitions.
    pub fn as_str(&self) -> Option<&'a str> {
        match *self {
            Self::Anonymous => None,
            Self::Entry => Some("entry"),
            Self::Exit => Some("exit"),
            Self::Named(name) => Some(name),
        }
    }
}

/// Metadata of one compiled transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TransitionInfo<'a> {
    pub source: &'a str,
    pub destination: Endpoint<'a>,
    pub event: EventLabel<'a>,
    /// Guard name; `None` for the always-true guard.
    pub guard: Option<&'a str>,
    /// Action name; `None` for the no-op action.
    pub action: Option<&'a str>,
    /// Whether the source is the machine's initial state.
    pub initial: bool,
}

impl<'a> TransitionInfo<'a> {
    fn new<S: State>(transition: &'a Transition<S>, initial: &S) -> Self {
        let destination = if transition.to.is_terminal() {
            Endpoint::Terminal
        } else {
            Endpoint::State(transition.to.name())
        };
        Self {
            source: transition.from.name(),
            destination,
            event: EventLabel::of(&transition.event),
            guard: (!transition.guard.is_always()).then(|| transition.guard.name()),
            action: (!transition.action.is_none()).then(|| transition.action.name()),
            initial: transition.from == *initial,
        }
    }

    /// Entry and exit rows describe hooks on one state rather than an edge.
    pub fn is_hook(&self) -> bool {
        matches!(self.event, EventLabel::Entry | EventLabel::Exit)
    }
}

/// Lazy iterator over [`TransitionInfo`] in declaration order.
///
/// A clone continues from the current position. Call
/// [`StateMachine::transitions`] again to restart from the top.
pub struct Transitions<'a, S: State> {
    table: std::slice::Iter<'a, Transition<S>>,
    initial: &'a S,
}

impl<'a, S: State> Clone for Transitions<'a, S> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            initial: self.initial,
        }
    }
}

impl<'a, S: State> Iterator for Transitions<'a, S> {
    type Item = TransitionInfo<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.table
            .next()
            .map(|transition| TransitionInfo::new(transition, self.initial))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.table.size_hint()
    }
}

impl<S: State> ExactSizeIterator for Transitions<'_, S> {}

impl<S: State> FusedIterator for Transitions<'_, S> {}

impl<S: State> StateMachine<S> {
    /// Walk the compiled transitions in declaration order.
    pub fn transitions(&self) -> Transitions<'_, S> {
        Transitions {
            table: self.table().iter(),
            initial: self.registry().state(self.initial_id()),
        }
    }

    /// Registered states in id order.
    pub fn states(&self) -> impl Iterator<Item = &S> + '_ {
        self.registry().states().iter()
    }

    /// Registered event tags in id order.
    pub fn events(&self) -> impl Iterator<Item = &EventTag> + '_ {
        self.registry().events().iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{transition, StateMachineBuilder};
    use crate::core::{Guard, OnEntry, OnExit};

    #[derive(Clone, PartialEq, Debug)]
    enum Job {
        Queued,
        Running,
        Finished,
    }

    impl State for Job {
        fn name(&self) -> &str {
            match self {
                Self::Queued => "Queued",
                Self::Running => "Running",
                Self::Finished => "Finished",
            }
        }

        fn is_terminal(&self) -> bool {
            matches!(self, Self::Finished)
        }
    }

    struct Run;
    struct Done;

    fn ready() -> bool {
        true
    }

    fn report() {}

    fn machine() -> StateMachine<Job> {
        StateMachineBuilder::new()
            .initial(Job::Queued)
            .transition(transition(Job::Queued).on::<Run>().when(ready).to(Job::Running))
            .unwrap()
            .transition(transition(Job::Running).on::<OnEntry>().then(report))
            .unwrap()
            .transition(transition(Job::Running).on::<OnExit>())
            .unwrap()
            .transition(transition(Job::Running).on::<Done>().then(report).to(Job::Finished))
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn records_follow_declaration_order() {
        let machine = machine();
        let records: Vec<_> = machine.transitions().collect();

        assert_eq!(records.len(), 4);
        assert_eq!(
            records[0],
            TransitionInfo {
                source: "Queued",
                destination: Endpoint::State("Running"),
                event: EventLabel::Named("Run"),
                guard: Some("ready"),
                action: None,
                initial: true,
            }
        );
        assert_eq!(records[3].destination, Endpoint::Terminal);
        assert_eq!(records[3].action, Some("report"));
        assert!(!records[3].initial);
    }

    #[test]
    fn hooks_use_literal_names() {
        let machine = machine();
        let records: Vec<_> = machine.transitions().collect();

        assert_eq!(records[1].event.as_str(), Some("entry"));
        assert_eq!(records[2].event.as_str(), Some("exit"));
        assert!(records[1].is_hook());
        assert!(!records[0].is_hook());
    }

    #[test]
    fn view_is_restartable() {
        let machine = machine();
        let mut walk = machine.transitions();

        assert_eq!(walk.len(), 4);
        assert_eq!(walk.next().map(|info| info.source), Some("Queued"));

        let resumed = walk.clone();
        assert_eq!(resumed.len(), 3);
        assert_eq!(walk.next(), resumed.clone().next());
        assert_eq!(machine.transitions().count(), 4);
    }

    #[test]
    fn default_guard_and_action_are_hidden() {
        let machine = StateMachineBuilder::new()
            .initial(Job::Queued)
            .transition(
                transition(Job::Queued)
                    .when(Guard::always())
                    .to(Job::Running),
            )
            .unwrap()
            .build()
            .unwrap();

        let info = machine.transitions().next().unwrap();
        assert_eq!(info.event, EventLabel::Anonymous);
        assert_eq!(info.event.as_str(), None);
        assert_eq!(info.guard, None);
        assert_eq!(info.action, None);
    }

    #[test]
    fn records_serialize_for_external_tools() {
        let machine = machine();
        let json = serde_json::to_value(machine.transitions().collect::<Vec<_>>()).unwrap();

        assert_eq!(json[0]["source"], "Queued");
        assert_eq!(json[0]["destination"]["state"], "Running");
        assert_eq!(json[0]["event"]["named"], "Run");
        assert_eq!(json[3]["destination"], "terminal");
        assert_eq!(json[1]["event"], "entry");
    }

    #[test]
    fn registry_is_enumerable() {
        let machine = machine();

        let states: Vec<_> = machine.states().map(State::name).collect();
        assert_eq!(states, ["Queued", "Running", "Finished"]);
        assert_eq!(machine.events().count(), 4);
    }
}
