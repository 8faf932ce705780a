//! Routing of runtime-tagged input to typed events.
//!
//! Wire protocols identify messages by a runtime value (an opcode, a frame
//! id). A [`Dispatcher`] maps that key to a decoder producing the typed event
//! the transition table reacts to.

use crate::builder::BuildError;
use crate::core::State;
use crate::engine::machine::{Outcome, StateMachine};
use std::any::Any;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

type Route<R, S> = Box<dyn Fn(&R, &StateMachine<S>) -> Outcome + Send + Sync>;

/// Decodes raw input `R` by key `K` and dispatches the result.
pub struct Dispatcher<R, K, S: State> {
    key: fn(&R) -> K,
    routes: HashMap<K, Route<R, S>>,
}

impl<R: 'static, K, S> Dispatcher<R, K, S>
where
    K: Eq + Hash + Debug,
    S: State,
{
    /// `key` extracts the routing key from raw input.
    pub fn new(key: fn(&R) -> K) -> Self {
        Self {
            key,
            routes: HashMap::new(),
        }
    }

    /// Register `decode` for inputs whose key is `key`.
    pub fn route<E, F>(mut self, key: K, decode: F) -> Result<Self, BuildError>
    where
        E: Any + Send,
        F: Fn(&R) -> E + Send + Sync + 'static,
    {
        if self.routes.contains_key(&key) {
            return Err(BuildError::DuplicateRoute {
                key: format!("{key:?}"),
            });
        }
        self.routes.insert(
            key,
            Box::new(move |raw: &R, machine: &StateMachine<S>| machine.dispatch(decode(raw))),
        );
        Ok(self)
    }

    /// Decode `raw` and dispatch it on `machine`.
    ///
    /// Input with an unregistered key is [`Outcome::Unhandled`].
    pub fn dispatch(&self, raw: &R, machine: &StateMachine<S>) -> Outcome {
        match self.routes.get(&(self.key)(raw)) {
            Some(route) => route(raw, machine),
            None => Outcome::Unhandled,
        }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{transition, StateMachineBuilder};

    #[derive(Clone, PartialEq, Debug)]
    enum Modem {
        Idle,
        Dialing,
        Online,
    }

    impl State for Modem {
        fn name(&self) -> &str {
            match self {
                Self::Idle => "Idle",
                Self::Dialing => "Dialing",
                Self::Online => "Online",
            }
        }
    }

    struct Frame {
        opcode: u8,
        payload: Vec<u8>,
    }

    struct Dial(Vec<u8>);
    struct Carrier;

    fn opcode(frame: &Frame) -> u8 {
        frame.opcode
    }

    fn machine() -> StateMachine<Modem> {
        StateMachineBuilder::new()
            .initial(Modem::Idle)
            .transition(
                transition(Modem::Idle)
                    .on::<Dial>()
                    .when(|dial: &Dial| !dial.0.is_empty())
                    .to(Modem::Dialing),
            )
            .unwrap()
            .transition(transition(Modem::Dialing).on::<Carrier>().to(Modem::Online))
            .unwrap()
            .build()
            .unwrap()
    }

    fn dispatcher() -> Dispatcher<Frame, u8, Modem> {
        Dispatcher::new(opcode)
            .route(0x01, |frame: &Frame| Dial(frame.payload.clone()))
            .unwrap()
            .route(0x02, |_: &Frame| Carrier)
            .unwrap()
    }

    #[test]
    fn routes_decode_to_typed_events() {
        let machine = machine();
        let dispatcher = dispatcher();

        let dial = Frame {
            opcode: 0x01,
            payload: b"555".to_vec(),
        };
        let carrier = Frame {
            opcode: 0x02,
            payload: Vec::new(),
        };

        assert_eq!(dispatcher.dispatch(&dial, &machine), Outcome::Handled);
        assert_eq!(dispatcher.dispatch(&carrier, &machine), Outcome::Handled);
        assert!(machine.is(&Modem::Online));
    }

    #[test]
    fn decoded_payload_reaches_the_guard() {
        let machine = machine();
        let empty = Frame {
            opcode: 0x01,
            payload: Vec::new(),
        };

        assert_eq!(dispatcher().dispatch(&empty, &machine), Outcome::Unhandled);
        assert!(machine.is(&Modem::Idle));
    }

    #[test]
    fn unknown_keys_are_unhandled() {
        let machine = machine();
        let frame = Frame {
            opcode: 0x7f,
            payload: Vec::new(),
        };

        assert_eq!(dispatcher().dispatch(&frame, &machine), Outcome::Unhandled);
    }

    #[test]
    fn duplicate_routes_are_rejected() {
        let result = dispatcher().route(0x02, |_: &Frame| Carrier);

        assert!(matches!(
            result,
            Err(BuildError::DuplicateRoute { key }) if key == "2"
        ));
        assert_eq!(dispatcher().len(), 2);
    }
}
