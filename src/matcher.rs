use std::collections::BTreeSet;

use crate::nfa::{Automaton, StateId};

/// A matcher that runs an automaton by tracking the set of states it could
/// be in, one input character at a time.
///
/// It accepts exactly the inputs [`Automaton::matches`] accepts, but its
/// running time is linear in the input for any pattern.
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'a> {
    nfa: &'a Automaton,
}

impl<'a> Matcher<'a> {
    /// Create a new matcher for the given automaton
    pub fn new(nfa: &'a Automaton) -> Self {
        Self { nfa }
    }

    /// Check if the entire input matches
    pub fn is_match(&self, input: &str) -> bool {
        let mut current = self.nfa.epsilon_closure(&BTreeSet::from([self.nfa.start()]));

        for (position, c) in input.chars().enumerate() {
            if current.is_empty() {
                break;
            }
            current = self.step(&current, c);
            trace!("after {:?} at {}: {:?}", c, position, current);
        }

        self.nfa.is_accepting(&current)
    }

    /// Move every state in `current` over `c`, then close over epsilon edges
    fn step(&self, current: &BTreeSet<StateId>, c: char) -> BTreeSet<StateId> {
        let Ok(symbol) = u8::try_from(c) else {
            return BTreeSet::new();
        };

        let next: BTreeSet<StateId> = current
            .iter()
            .filter_map(|&id| self.nfa.state(id))
            .flat_map(|state| state.transitions_on(symbol).iter().copied())
            .collect();

        self.nfa.epsilon_closure(&next)
    }
}
