//! Regex compiler.
//!
//! A pattern goes through three passes:
//!
//! 1. The pattern is split into tokens, and an explicit concatenation token
//!    is inserted wherever two tokens are implicitly concatenated.
//! 2. The tokens are reordered into postfix form with an operator stack.
//! 3. The postfix stream is evaluated with an operand stack, calling the
//!    construction operators in [`crate::construct`].
//!
//! Runs of plain characters are kept as text during evaluation and only turn
//! into an automaton once an operator other than concatenation needs them.

use std::fmt;

use crate::construct::{alt, empty, plus, seq, star, Piece};
use crate::nfa::Automaton;
use crate::{CompileError, CompileResult, SyntaxError};

/// Classes, bounded repetition, anchors, escapes, any-char and optional.
/// None of these are literals.
const UNSUPPORTED: &[char] = &['[', ']', '{', '}', '^', '$', '\\', '.', '?'];

const DEFAULT_SIZE_LIMIT: usize = 1 << 20;

/// Compile `pattern` with the default configuration
pub fn compile(pattern: &str) -> CompileResult<Automaton> {
    Compiler::new().compile(pattern)
}

/// Compiler that turns a pattern string into a Thompson NFA
#[derive(Clone, Debug)]
pub struct Compiler {
    size_limit: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Token {
    Symbol(char),
    /// An empty group, `()`.
    Empty,
    Concat,
    Union,
    Star,
    Plus,
    Open,
    Close,
}

impl Token {
    fn precedence(self) -> u8 {
        match self {
            Token::Open => 1,
            Token::Union => 2,
            Token::Concat => 3,
            Token::Star | Token::Plus => 4,
            _ => 0,
        }
    }

    /// Whether this token applies to what comes before it.
    fn is_operator(self) -> bool {
        matches!(self, Token::Union | Token::Star | Token::Plus)
    }

    fn as_char(self) -> char {
        match self {
            Token::Symbol(c) => c,
            Token::Empty => 'ε',
            Token::Concat => '.',
            Token::Union => '|',
            Token::Star => '*',
            Token::Plus => '+',
            Token::Open => '(',
            Token::Close => ')',
        }
    }
}

/// A token together with the byte offset it came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Spanned {
    pos: usize,
    token: Token,
}

struct Stream<'a>(&'a [Spanned]);

impl fmt::Display for Stream<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|t| write!(f, "{}", t.token.as_char()))
    }
}

impl Compiler {
    /// Create a new compiler
    pub fn new() -> Self {
        Self { size_limit: Some(DEFAULT_SIZE_LIMIT) }
    }

    /// Set the maximum number of states the compiled automaton may have.
    ///
    /// `None` removes the limit. Since `+` duplicates its operand, nesting it
    /// grows an automaton exponentially.
    pub fn size_limit(&mut self, limit: Option<usize>) -> &mut Self {
        self.size_limit = limit;
        self
    }

    /// Compile a pattern to a Thompson NFA
    pub fn compile(&self, pattern: &str) -> CompileResult<Automaton> {
        let tokens = annotate(tokenize(pattern)?);
        trace!("annotated {:?} as {}", pattern, Stream(&tokens));

        let postfix = to_postfix(&tokens)?;
        trace!("postfix for {:?} is {}", pattern, Stream(&postfix));

        let nfa = self.evaluate(&postfix)?;
        debug!("compiled {:?} into {} states", pattern, nfa.len());
        Ok(nfa)
    }

    fn evaluate(&self, postfix: &[Spanned]) -> CompileResult<Automaton> {
        let mut stack: Vec<Piece> = Vec::new();

        for &Spanned { pos, token } in postfix {
            let missing = || SyntaxError::MissingOperand { pos, op: token.as_char() };

            let piece = match token {
                Token::Symbol(c) => Piece::from(c),
                Token::Empty => Piece::Automaton(empty()),
                Token::Concat | Token::Union => {
                    let right = stack.pop().ok_or_else(missing)?;
                    let left = stack.pop().ok_or_else(missing)?;
                    match (token, left, right) {
                        (Token::Concat, Piece::Literal(mut left), Piece::Literal(right)) => {
                            left.push_str(&right);
                            Piece::Literal(left)
                        }
                        (Token::Concat, left, right) => {
                            Piece::Automaton(self.check(seq(vec![left, right])?)?)
                        }
                        (_, left, right) => {
                            Piece::Automaton(self.check(alt(vec![left, right])?)?)
                        }
                    }
                }
                Token::Star | Token::Plus => {
                    let operand = stack.pop().ok_or_else(missing)?.into_automaton()?;
                    let nfa = if token == Token::Star { star(operand) } else { plus(operand) };
                    Piece::Automaton(self.check(nfa)?)
                }
                // Grouping never survives the postfix conversion.
                Token::Open | Token::Close => continue,
            };
            stack.push(piece);
        }

        if stack.len() > 1 {
            return Err(SyntaxError::Unreduced { remaining: stack.len() }.into());
        }
        match stack.pop() {
            Some(piece) => self.check(piece.into_automaton()?),
            // Nothing but empty groups, or nothing at all.
            None => Ok(empty()),
        }
    }

    fn check(&self, nfa: Automaton) -> CompileResult<Automaton> {
        match self.size_limit {
            Some(limit) if nfa.len() > limit => Err(CompileError::TooComplex { limit }),
            _ => Ok(nfa),
        }
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

fn tokenize(pattern: &str) -> CompileResult<Vec<Spanned>> {
    pattern
        .char_indices()
        .map(|(pos, c)| {
            let token = match c {
                '|' => Token::Union,
                '*' => Token::Star,
                '+' => Token::Plus,
                '(' => Token::Open,
                ')' => Token::Close,
                c if UNSUPPORTED.contains(&c) => {
                    return Err(CompileError::UnsupportedPattern { pos, found: c })
                }
                c => Token::Symbol(c),
            };
            Ok(Spanned { pos, token })
        })
        .collect()
}

/// Insert a concatenation token between every pair of adjacent tokens that
/// are implicitly concatenated.
fn annotate(tokens: Vec<Spanned>) -> Vec<Spanned> {
    let mut annotated = Vec::with_capacity(tokens.len() * 2);
    let mut tokens = tokens.into_iter().peekable();

    while let Some(current) = tokens.next() {
        annotated.push(current);
        let Some(&next) = tokens.peek() else {
            break;
        };
        if current.token != Token::Open
            && current.token != Token::Union
            && next.token != Token::Close
            && !next.token.is_operator()
        {
            annotated.push(Spanned { pos: next.pos, token: Token::Concat });
        }
    }
    annotated
}

/// Shunting-yard conversion to postfix.
fn to_postfix(tokens: &[Spanned]) -> Result<Vec<Spanned>, SyntaxError> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut operators: Vec<Spanned> = Vec::new();
    let mut previous = None;

    for &spanned in tokens {
        match spanned.token {
            Token::Symbol(_) | Token::Empty => output.push(spanned),
            Token::Open => operators.push(spanned),
            Token::Close => {
                if previous == Some(Token::Open) {
                    output.push(Spanned { pos: spanned.pos, token: Token::Empty });
                }
                loop {
                    match operators.pop() {
                        Some(Spanned { token: Token::Open, .. }) => break,
                        Some(op) => output.push(op),
                        None => return Err(SyntaxError::UnopenedGroup { pos: spanned.pos }),
                    }
                }
            }
            op => {
                while let Some(&top) = operators.last() {
                    if top.token.precedence() < op.precedence() {
                        break;
                    }
                    output.push(top);
                    operators.pop();
                }
                operators.push(spanned);
            }
        }
        previous = Some(spanned.token);
    }

    while let Some(op) = operators.pop() {
        if op.token == Token::Open {
            return Err(SyntaxError::UnclosedGroup { pos: op.pos });
        }
        output.push(op);
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn postfix(pattern: &str) -> String {
        let tokens = annotate(tokenize(pattern).unwrap());
        Stream(&to_postfix(&tokens).unwrap()).to_string()
    }

    fn annotated(pattern: &str) -> String {
        Stream(&annotate(tokenize(pattern).unwrap())).to_string()
    }

    fn syntax_error(pattern: &str) -> SyntaxError {
        match compile(pattern) {
            Err(CompileError::Syntax(err)) => err,
            other => panic!("expected a syntax error for {:?}, got {:?}", pattern, other),
        }
    }

    #[test]
    fn inserts_implicit_concatenation() {
        assert_eq!(annotated("abc"), "a.b.c");
        assert_eq!(annotated("a*b"), "a*.b");
        assert_eq!(annotated("(a)(b)"), "(a).(b)");
        assert_eq!(annotated("a(b|c)d"), "a.(b|c).d");
        assert_eq!(annotated("a|b"), "a|b");
        assert_eq!(annotated("(ab|bb)+"), "(a.b|b.b)+");
    }

    #[test]
    fn converts_to_postfix() {
        assert_eq!(postfix("ab"), "ab.");
        assert_eq!(postfix("a|b"), "ab|");
        assert_eq!(postfix("ab|c"), "ab.c|");
        assert_eq!(postfix("a|bc"), "abc.|");
        assert_eq!(postfix("ab*"), "ab*.");
        assert_eq!(postfix("(ab|bb)*"), "ab.bb.|*");
        assert_eq!(postfix("a(bbb|bbbb)"), "abb.b.bb.b.b.|.");
        assert_eq!(postfix("a**"), "a**");
        assert_eq!(postfix("()"), "ε");
    }

    #[test]
    fn empty_pattern() {
        let nfa = compile("").unwrap();
        assert!(nfa.matches(""));
        assert!(!nfa.matches("x"));

        let nfa = compile("()").unwrap();
        assert!(nfa.matches(""));
        assert!(!nfa.matches("x"));

        let nfa = compile("a()b").unwrap();
        assert!(nfa.matches("ab"));
    }

    #[test]
    fn literal_runs_stay_text() {
        let nfa = compile("abc").unwrap();
        // One literal per character plus nothing else.
        assert_eq!(nfa.len(), 6);
        assert!(nfa.matches("abc"));
        assert!(!nfa.matches("abcd"));
    }

    #[test]
    fn zero_or_more_pairs() {
        let nfa = compile("(ab|bb)*").unwrap();
        assert!(nfa.matches(""));
        assert!(nfa.matches("ab"));
        assert!(nfa.matches("bb"));
        assert!(!nfa.matches("a"));
        assert!(nfa.matches("abbb"));
        assert!(nfa.matches("bbab"));
        assert!(!nfa.matches("baba"));
    }

    #[test]
    fn one_or_more_pairs() {
        let nfa = compile("(ab|bb)+").unwrap();
        assert!(!nfa.matches(""));
        assert!(nfa.matches("ab"));
        // bb bb bb ab ab bb bb
        assert!(nfa.matches("bbbbbbababbbbb"));
        assert!(!nfa.matches("bbbbbbababbbb"));
    }

    #[test]
    fn alternation_of_runs() {
        let nfa = compile("a(bbb|bbbb)").unwrap();
        assert!(nfa.matches("abbb"));
        assert!(nfa.matches("abbbb"));
        assert!(!nfa.matches("abb"));
        assert!(!nfa.matches("abbbbb"));

        let nfa = compile("(ab|bb)*bc").unwrap();
        assert!(nfa.matches("bc"));
        assert!(nfa.matches("abbc"));
        assert!(!nfa.matches("abbb"));
    }

    #[test]
    fn precedence() {
        let nfa = compile("ab|cd*").unwrap();
        assert!(nfa.matches("ab"));
        assert!(nfa.matches("c"));
        assert!(nfa.matches("cddd"));
        assert!(!nfa.matches("abd"));
        assert!(!nfa.matches("abcd"));
    }

    #[test]
    fn unbalanced_groups() {
        assert_eq!(syntax_error("(ab|bb"), SyntaxError::UnclosedGroup { pos: 0 });
        assert_eq!(syntax_error("ab)"), SyntaxError::UnopenedGroup { pos: 2 });
        assert_eq!(syntax_error("((a)"), SyntaxError::UnclosedGroup { pos: 0 });
    }

    #[test]
    fn missing_operands() {
        assert_eq!(syntax_error("*a"), SyntaxError::MissingOperand { pos: 0, op: '*' });
        assert_eq!(syntax_error("+"), SyntaxError::MissingOperand { pos: 0, op: '+' });
        assert_eq!(syntax_error("a|"), SyntaxError::MissingOperand { pos: 1, op: '|' });
        assert_eq!(syntax_error("|a"), SyntaxError::MissingOperand { pos: 0, op: '|' });
        assert_eq!(syntax_error("(|)"), SyntaxError::MissingOperand { pos: 1, op: '|' });
    }

    #[test]
    fn unsupported_syntax() {
        for (pattern, pos, found) in [
            ("[ab]", 0, '['),
            ("ab{3,4}", 2, '{'),
            ("^ab", 0, '^'),
            ("ab$", 2, '$'),
            ("(a)\\1", 3, '\\'),
            ("a.b", 1, '.'),
            ("a*?", 2, '?'),
        ] {
            assert_eq!(
                compile(pattern).unwrap_err(),
                CompileError::UnsupportedPattern { pos, found },
                "{:?}",
                pattern
            );
        }
    }

    #[test]
    fn symbols_outside_byte_range() {
        assert!(matches!(compile("aλ"), Err(CompileError::InvalidArgument(_))));
        assert!(compile("caf\u{e9}").unwrap().matches("caf\u{e9}"));
    }

    #[test]
    fn size_limit() {
        let err = Compiler::new().size_limit(Some(5)).compile("(ab)*").unwrap_err();
        assert_eq!(err, CompileError::TooComplex { limit: 5 });

        assert!(Compiler::new().size_limit(Some(5)).compile("ab").is_ok());
        assert!(Compiler::new().size_limit(None).compile("((((a+)+)+)+)+").is_ok());
    }
}
