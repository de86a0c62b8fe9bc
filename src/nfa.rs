use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::{CompileError, CompileResult};

/// A state ID in an automaton.
///
/// IDs are only meaningful for the automaton that handed them out. When an
/// automaton is composed into a larger one its states are renumbered, so IDs
/// taken from an operand before composition must not be used afterwards.
pub type StateId = usize;

/// A Thompson NFA state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    is_final: bool,
    /// Destinations keyed by the input symbol (`0..=255`) that moves there.
    transitions: BTreeMap<u8, Vec<StateId>>,
    /// Destinations reachable without consuming input, in insertion order.
    epsilons: Vec<StateId>,
}

impl State {
    fn new(is_final: bool) -> Self {
        State { is_final, ..State::default() }
    }

    /// Whether the automaton accepts when input runs out in this state
    pub fn is_final(&self) -> bool {
        self.is_final
    }

    /// Destinations for `symbol`, in the order the transitions were added
    pub fn transitions_on(&self, symbol: u8) -> &[StateId] {
        self.transitions.get(&symbol).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All symbol transitions, ordered by symbol
    pub fn transitions(&self) -> impl Iterator<Item = (u8, &[StateId])> + '_ {
        self.transitions.iter().map(|(&symbol, targets)| (symbol, targets.as_slice()))
    }

    /// Epsilon destinations, in the order they were added
    pub fn epsilons(&self) -> &[StateId] {
        &self.epsilons
    }
}

/// A Thompson NFA fragment with one entry and one exit.
///
/// An automaton owns every state reachable from it. The construction
/// operators in [`crate::construct`] take their operands by value, so a
/// fragment that has been composed into a bigger one is gone and cannot be
/// wired a second time. Cloning produces an independent deep copy.
///
/// While an automaton is only built through the construction operators, its
/// `end` is its one and only final state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Automaton {
    states: Vec<State>,
    start: StateId,
    end: StateId,
}

impl Automaton {
    /// Create an automaton with a fresh start and a fresh final end state and
    /// no edges between them.
    ///
    /// This is the seed every construction operator starts from; on its own
    /// it accepts nothing.
    pub(crate) fn with_endpoints() -> Self {
        let mut nfa = Automaton { states: Vec::new(), start: 0, end: 0 };
        nfa.start = nfa.add_state(false);
        nfa.end = nfa.add_state(true);
        nfa
    }

    /// Add a new state with no transitions and return its ID
    pub fn add_state(&mut self, is_final: bool) -> StateId {
        let id = self.states.len();
        self.states.push(State::new(is_final));
        id
    }

    /// Add a transition from `from` to `to` on the symbol `value`.
    ///
    /// `value` is a Unicode scalar value and must lie in `0..=255`.
    pub fn add_char_transition(
        &mut self,
        from: StateId,
        value: u32,
        to: StateId,
    ) -> CompileResult<()> {
        let symbol = u8::try_from(value).map_err(|_| {
            CompileError::InvalidArgument(format!(
                "transition symbol {:#x} is outside 0..=255",
                value
            ))
        })?;
        self.check(to)?;
        self.state_mut(from)?.transitions.entry(symbol).or_default().push(to);
        Ok(())
    }

    /// Connect two states with an epsilon transition
    pub fn add_epsilon_transition(
        &mut self,
        from: StateId,
        to: StateId,
    ) -> CompileResult<()> {
        self.check(to)?;
        self.state_mut(from)?.epsilons.push(to);
        Ok(())
    }

    /// The entry state
    pub fn start(&self) -> StateId {
        self.start
    }

    /// The exit state
    pub fn end(&self) -> StateId {
        self.end
    }

    /// Number of states owned by this automaton
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.get(id)
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Check whether the entire `input` is accepted.
    ///
    /// This runs the backtracking simulation in [`crate::backtrack`]. For a
    /// matcher that stays linear on ambiguous patterns, see
    /// [`crate::Matcher`].
    pub fn matches(&self, input: &str) -> bool {
        crate::backtrack::simulate(self, input)
    }

    /// Get epsilon closure of a set of states
    pub fn epsilon_closure(&self, states: &BTreeSet<StateId>) -> BTreeSet<StateId> {
        let mut closure = states.clone();
        let mut stack: Vec<StateId> = states.iter().copied().collect();

        while let Some(id) = stack.pop() {
            let Some(state) = self.states.get(id) else {
                continue;
            };
            for &next in &state.epsilons {
                if closure.insert(next) {
                    stack.push(next);
                }
            }
        }

        closure
    }

    /// Check if any state in the set is final
    pub fn is_accepting(&self, states: &BTreeSet<StateId>) -> bool {
        states.iter().any(|&id| self.states.get(id).map_or(false, State::is_final))
    }

    /// Add an epsilon edge between two states this automaton handed out.
    ///
    /// Panics if either ID is out of range.
    pub(crate) fn connect(&mut self, from: StateId, to: StateId) {
        assert!(to < self.states.len(), "state {} out of range", to);
        self.states[from].epsilons.push(to);
    }

    /// Add a transition on `symbol` between two states this automaton handed
    /// out. Panics if either ID is out of range.
    pub(crate) fn connect_on(&mut self, from: StateId, symbol: u8, to: StateId) {
        assert!(to < self.states.len(), "state {} out of range", to);
        self.states[from].transitions.entry(symbol).or_default().push(to);
    }

    pub(crate) fn set_final(&mut self, id: StateId, is_final: bool) {
        if let Some(state) = self.states.get_mut(id) {
            state.is_final = is_final;
        }
    }

    pub(crate) fn set_end(&mut self, id: StateId) {
        self.end = id;
    }

    /// Move every state of `other` into `self`, renumbering them past the
    /// states already here. Returns the new IDs of `other`'s start and end.
    pub(crate) fn absorb(&mut self, other: Automaton) -> (StateId, StateId) {
        let offset = self.states.len();
        let Automaton { states, start, end } = other;

        self.states.extend(states.into_iter().map(|mut state| {
            for targets in state.transitions.values_mut() {
                targets.iter_mut().for_each(|id| *id += offset);
            }
            state.epsilons.iter_mut().for_each(|id| *id += offset);
            state
        }));

        (start + offset, end + offset)
    }

    fn check(&self, id: StateId) -> CompileResult<()> {
        if id < self.states.len() {
            Ok(())
        } else {
            Err(CompileError::InvalidArgument(format!(
                "state {} does not belong to this automaton ({} states)",
                id,
                self.states.len()
            )))
        }
    }

    fn state_mut(&mut self, id: StateId) -> CompileResult<&mut State> {
        self.check(id)?;
        Ok(&mut self.states[id])
    }
}

impl fmt::Display for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "start: {}", self.start)?;
        writeln!(f, "end: {}", self.end)?;
        writeln!(f, "states:")?;
        for (id, state) in self.states.iter().enumerate() {
            write!(f, "  {:>4}", id)?;
            if state.is_final {
                write!(f, " FINAL")?;
            }
            writeln!(f)?;
            for (symbol, targets) in state.transitions() {
                writeln!(f, "       {:?} -> {:?}", symbol as char, targets)?;
            }
            if !state.epsilons.is_empty() {
                writeln!(f, "       ε -> {:?}", state.epsilons)?;
            }
        }
        Ok(())
    }
}
