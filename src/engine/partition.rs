//! Per (event, state) candidate lists.

use crate::core::State;
use crate::engine::registry::{EventId, Registry, StateId};
use crate::engine::transition::Transition;
use std::ops::Range;

/// A transition that may fire for some (event, state) pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate {
    /// Index into the transition table.
    pub transition: usize,
    /// Destination resolved at build time.
    pub destination: StateId,
}

/// Flat `[event][state]` table of candidate slices.
///
/// Every row keeps the declaration order of the table, which is what makes
/// the first passing guard win.
#[derive(Debug)]
pub struct PartitionTable {
    states: usize,
    rows: Vec<Range<usize>>,
    candidates: Vec<Candidate>,
}

impl PartitionTable {
    pub fn build<S: State>(registry: &Registry<S>, transitions: &[Transition<S>]) -> Self {
        let states = registry.states().len();
        let mut buckets: Vec<Vec<Candidate>> = vec![Vec::new(); registry.events().len() * states];

        for (index, transition) in transitions.iter().enumerate() {
            let (Some(source), Some(destination), Some(event)) = (
                registry.state_id(&transition.from),
                registry.state_id(&transition.to),
                registry.event_id(transition.event.id()),
            ) else {
                continue;
            };
            buckets[event.0 * states + source.0].push(Candidate {
                transition: index,
                destination,
            });
        }

        let mut rows = Vec::with_capacity(buckets.len());
        let mut candidates = Vec::with_capacity(transitions.len());
        for bucket in buckets {
            let start = candidates.len();
            candidates.extend(bucket);
            rows.push(start..candidates.len());
        }

        Self {
            states,
            rows,
            candidates,
        }
    }

    /// Candidates for `state` receiving `event`, in declaration order.
    pub fn candidates(&self, event: EventId, state: StateId) -> &[Candidate] {
        match self.rows.get(event.0 * self.states + state.0) {
            Some(row) => &self.candidates[row.clone()],
            None => &[],
        }
    }

    /// Number of non-empty (event, state) rows.
    pub fn occupied(&self) -> usize {
        self.rows.iter().filter(|row| !row.is_empty()).count()
    }
}
