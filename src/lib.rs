//! Thompson NFA construction and matching
//!
//! This library compiles a regular expression into a nondeterministic finite
//! automaton using Thompson's construction, and decides whether a whole input
//! is accepted by that automaton.
//!
//! The supported grammar is deliberately small:
//! - `|` alternation, `*` zero or more, `+` one or more
//! - implicit concatenation and grouping with `(` and `)`
//! - every other character in `0..=255` is a literal, except for
//!   `[ ] { } ^ $ \ . ?` which are rejected
//!
//! Matching is always anchored at both ends.
//!
//! ```
//! let re = thompson::compile("(ab|bb)*").unwrap();
//! assert!(re.matches("bbab"));
//! assert!(!re.matches("baba"));
//! ```
//!
//! Automata can also be assembled directly from the construction operators:
//!
//! ```
//! use thompson::{alt, seq, Piece};
//!
//! let runs = alt(vec!["bbb".into(), "bbbb".into()]).unwrap();
//! let re = seq(vec![Piece::from("a"), runs.into()]).unwrap();
//! assert!(re.matches("abbbb"));
//! assert!(!re.matches("abb"));
//! ```
//!
//! # Crate features
//!
//! * **logging** (enabled by default) - Emits compilation and simulation
//!   traces through the `log` crate.

#[macro_use]
mod macros;

pub mod backtrack;
pub mod compiler;
pub mod construct;
pub mod matcher;
pub mod nfa;

pub use compiler::{compile, Compiler};
pub use construct::{
    alt, concat, empty, literal, literal_char, literal_str, plus, seq, star,
    union, Piece,
};
pub use matcher::Matcher;
pub use nfa::{Automaton, State, StateId};

/// The result of compiling a regex or assembling an automaton by hand
pub type CompileResult<T> = Result<T, CompileError>;

/// Errors that can occur while building an automaton
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// A transition value outside `0..=255`, or a state that does not belong
    /// to the automaton being wired
    InvalidArgument(String),
    /// The pattern is not well formed
    Syntax(SyntaxError),
    /// The pattern uses syntax outside of the supported operator set
    UnsupportedPattern {
        /// Byte offset of the offending character in the pattern.
        pos: usize,
        found: char,
    },
    /// The automaton grew beyond the configured number of states
    TooComplex {
        limit: usize,
    },
}

/// The ways a pattern can be malformed.
///
/// Every position is a byte offset into the pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    /// A `)` without a matching `(`.
    UnopenedGroup { pos: usize },
    /// A `(` that is never closed.
    UnclosedGroup { pos: usize },
    /// An operator was applied with fewer operands than it takes.
    MissingOperand { pos: usize, op: char },
    /// Evaluation ended with more than one value on the stack.
    Unreduced { remaining: usize },
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileError::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            CompileError::Syntax(err) => write!(f, "syntax error: {}", err),
            CompileError::UnsupportedPattern { pos, found } => {
                write!(f, "unsupported pattern syntax {:?} at offset {}", found, pos)
            }
            CompileError::TooComplex { limit } => {
                write!(f, "regex pattern is too complex (more than {} states)", limit)
            }
        }
    }
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyntaxError::UnopenedGroup { pos } => {
                write!(f, "unopened group at offset {}", pos)
            }
            SyntaxError::UnclosedGroup { pos } => {
                write!(f, "unclosed group opened at offset {}", pos)
            }
            SyntaxError::MissingOperand { pos, op } => {
                write!(f, "operator '{}' at offset {} is missing an operand", op, pos)
            }
            SyntaxError::Unreduced { remaining } => {
                write!(f, "malformed expression ({} values left unreduced)", remaining)
            }
        }
    }
}

impl std::error::Error for CompileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CompileError::Syntax(err) => Some(err),
            _ => None,
        }
    }
}

impl std::error::Error for SyntaxError {}

impl From<SyntaxError> for CompileError {
    fn from(err: SyntaxError) -> Self {
        CompileError::Syntax(err)
    }
}
