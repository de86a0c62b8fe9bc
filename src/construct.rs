//! Thompson's construction.
//!
//! Each operator builds a small NFA fragment or glues existing fragments
//! together with epsilon edges. Operands are consumed: the states of an
//! operand move into the result, and the operand's old `start`/`end` IDs are
//! meaningless afterwards.
//!
//! Every fragment produced here has exactly one final state, its `end`.

use crate::nfa::Automaton;
use crate::{CompileError, CompileResult};

/// One element of a [`seq`] or [`alt`] list: either an automaton that was
/// already built, or literal text that still has to be expanded.
#[derive(Debug, Clone)]
pub enum Piece {
    Automaton(Automaton),
    Literal(String),
}

impl Piece {
    /// Build the automaton this piece stands for
    pub fn into_automaton(self) -> CompileResult<Automaton> {
        match self {
            Piece::Automaton(nfa) => Ok(nfa),
            Piece::Literal(text) => literal_str(&text),
        }
    }
}

impl From<Automaton> for Piece {
    fn from(nfa: Automaton) -> Self {
        Piece::Automaton(nfa)
    }
}

impl From<&str> for Piece {
    fn from(text: &str) -> Self {
        Piece::Literal(text.to_string())
    }
}

impl From<String> for Piece {
    fn from(text: String) -> Self {
        Piece::Literal(text)
    }
}

impl From<char> for Piece {
    fn from(c: char) -> Self {
        Piece::Literal(c.to_string())
    }
}

/// An automaton that matches only the empty string
pub fn empty() -> Automaton {
    let mut nfa = Automaton::with_endpoints();
    let (start, end) = (nfa.start(), nfa.end());
    nfa.connect(start, end);
    nfa
}

/// An automaton that matches exactly one `byte`
pub fn literal(byte: u8) -> Automaton {
    let mut nfa = Automaton::with_endpoints();
    let (start, end) = (nfa.start(), nfa.end());
    nfa.connect_on(start, byte, end);
    nfa
}

/// An automaton that matches exactly the character `c`.
///
/// Fails if `c` lies outside `0..=255`.
pub fn literal_char(c: char) -> CompileResult<Automaton> {
    let mut nfa = Automaton::with_endpoints();
    let (start, end) = (nfa.start(), nfa.end());
    nfa.add_char_transition(start, u32::from(c), end)?;
    Ok(nfa)
}

/// An automaton that matches exactly `text`.
///
/// The empty string becomes [`empty`], a single character a literal, and
/// longer strings are a left fold of [`concat`] over their characters.
pub fn literal_str(text: &str) -> CompileResult<Automaton> {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return Ok(empty());
    };
    chars.try_fold(literal_char(first)?, |nfa, c| Ok(concat(nfa, literal_char(c)?)))
}

/// Match `a` followed by `b`
pub fn concat(a: Automaton, b: Automaton) -> Automaton {
    let mut nfa = a;
    let a_end = nfa.end();
    nfa.set_final(a_end, false);

    let (b_start, b_end) = nfa.absorb(b);
    nfa.connect(a_end, b_start);
    nfa.set_end(b_end);
    nfa
}

/// Match either `a` or `b`
pub fn union(a: Automaton, b: Automaton) -> Automaton {
    let mut nfa = Automaton::with_endpoints();
    let (start, end) = (nfa.start(), nfa.end());

    for operand in [a, b] {
        let (op_start, op_end) = nfa.absorb(operand);
        nfa.set_final(op_end, false);
        nfa.connect(start, op_start);
        nfa.connect(op_end, end);
    }
    nfa
}

/// Match `a` zero or more times
pub fn star(a: Automaton) -> Automaton {
    let mut nfa = Automaton::with_endpoints();
    let (start, end) = (nfa.start(), nfa.end());

    let (a_start, a_end) = nfa.absorb(a);
    nfa.set_final(a_end, false);
    nfa.connect(a_end, a_start);
    nfa.connect(a_end, end);
    nfa.connect(start, a_start);
    nfa.connect(start, end);
    nfa
}

/// Match `a` one or more times.
///
/// The repetition is built from an independent copy of `a`, so the result
/// is `concat(a, star(copy of a))`.
pub fn plus(a: Automaton) -> Automaton {
    let repeated = star(a.clone());
    concat(a, repeated)
}

/// Concatenate every piece in order. An empty list matches the empty string.
pub fn seq(pieces: Vec<Piece>) -> CompileResult<Automaton> {
    pieces
        .into_iter()
        .try_fold(empty(), |nfa, piece| Ok(concat(nfa, piece.into_automaton()?)))
}

/// Match any one of the pieces. The list must not be empty.
pub fn alt(pieces: Vec<Piece>) -> CompileResult<Automaton> {
    let mut pieces = pieces.into_iter();
    let first = pieces.next().ok_or_else(|| {
        CompileError::InvalidArgument("alt needs at least one alternative".to_string())
    })?;
    pieces.try_fold(first.into_automaton()?, |nfa, piece| {
        Ok(union(nfa, piece.into_automaton()?))
    })
}
