//! Build errors for state machine and transition builders.

use thiserror::Error;

/// Errors that can occur when building state machines and transitions.
///
/// Every error is raised before the machine exists; dispatch itself never
/// fails.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("No transitions defined. Add at least one transition")]
    NoTransitions,

    #[error("Transition source state not specified. Call .from(state)")]
    MissingFromState,

    #[error("Initial state {state} does not appear in any transition")]
    UnknownInitialState { state: String },

    #[error("No dependency of type {type_name} for transition {transition}")]
    UnresolvedDependency {
        type_name: &'static str,
        transition: String,
    },

    #[error("Dependency of type {type_name} supplied more than once")]
    DuplicateDependency { type_name: &'static str },

    #[error("Route {key} registered more than once")]
    DuplicateRoute { key: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_item() {
        let err = BuildError::UnresolvedDependency {
            type_name: "app::Budget",
            transition: "Idle + Tick = Busy".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "No dependency of type app::Budget for transition Idle + Tick = Busy"
        );

        let err = BuildError::DuplicateRoute {
            key: "0x12".to_string(),
        };
        assert!(err.to_string().contains("0x12"));
    }
}
