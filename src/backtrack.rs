//! Backtracking simulation of an automaton.
//!
//! The search explores one path at a time. From each state it first tries
//! every transition on the next input character, then every epsilon edge.
//! A path fails when it runs out of moves, and the input is accepted as soon
//! as some path has consumed all of it and stands on a final state.
//!
//! Epsilon cycles are cut with a visited set. Epsilon moves share the set of
//! the state they leave from, while consuming a character starts a fresh one,
//! so a state can be visited again once input has been consumed.
//!
//! Nothing is memoized between paths, so ambiguous patterns such as `(a*)*`
//! can take exponential time. The search keeps its own stack instead of
//! recursing, so long inputs don't exhaust the call stack.

use std::collections::HashSet;

use crate::nfa::{Automaton, StateId};

#[derive(Debug)]
struct Frame {
    state: StateId,
    /// Index of the next input character.
    at: usize,
    /// Which visited set this frame belongs to.
    guard: usize,
}

/// Check whether `nfa` accepts all of `input`
pub fn simulate(nfa: &Automaton, input: &str) -> bool {
    let haystack: Vec<char> = input.chars().collect();
    let mut visited: HashSet<(usize, StateId)> = HashSet::new();
    let mut guards = 0;
    let mut stack = vec![Frame { state: nfa.start(), at: 0, guard: guards }];

    while let Some(Frame { state: id, at, guard }) = stack.pop() {
        if !visited.insert((guard, id)) {
            continue;
        }
        let Some(state) = nfa.state(id) else {
            continue;
        };

        // Frames are popped in reverse, so epsilon moves go on the stack
        // before the character moves they should be tried after.
        stack.extend(state.epsilons().iter().rev().map(|&next| Frame {
            state: next,
            at,
            guard,
        }));

        match haystack.get(at) {
            Some(&c) => {
                // Characters above 255 have no transitions at all.
                let Ok(symbol) = u8::try_from(c) else {
                    continue;
                };
                for &next in state.transitions_on(symbol).iter().rev() {
                    guards += 1;
                    stack.push(Frame { state: next, at: at + 1, guard: guards });
                }
            }
            None if state.is_final() => {
                trace!("accepted after visiting {} states", visited.len());
                return true;
            }
            None => {}
        }
    }

    trace!("rejected after visiting {} states", visited.len());
    false
}
