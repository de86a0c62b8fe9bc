use thompson::{
    compile, concat, empty, literal, plus, star, union, CompileError, Compiler,
    Matcher, SyntaxError,
};

#[test]
fn empty_pattern() {
    let nfa = compile("").unwrap();
    assert!(nfa.matches(""));
    assert!(!nfa.matches("x"));
}

#[test]
fn pairs_zero_or_more() {
    let nfa = compile("(ab|bb)*").unwrap();
    assert!(nfa.matches(""));
    assert!(nfa.matches("ab"));
    assert!(nfa.matches("bb"));
    assert!(!nfa.matches("a"));
    assert!(nfa.matches("abbb"));
    assert!(nfa.matches("bbab"));
    assert!(!nfa.matches("baba"));
    assert!(!nfa.matches("bc"));
}

#[test]
fn pairs_one_or_more() {
    let nfa = compile("(ab|bb)+").unwrap();
    assert!(!nfa.matches(""));
    assert!(nfa.matches("ab"));
    // bb bb bb ab ab bb bb
    assert!(nfa.matches("bbbbbbababbbbb"));
    assert!(!nfa.matches("bbbbbbababbbb"));
}

#[test]
fn three_or_four() {
    let nfa = compile("a(bbb|bbbb)").unwrap();
    assert!(nfa.matches("abbb"));
    assert!(nfa.matches("abbbb"));
    assert!(!nfa.matches("abb"));
    assert!(!nfa.matches("abbbbb"));
}

#[test]
fn unbalanced_parenthesis() {
    assert_eq!(
        compile("(ab|bb").unwrap_err(),
        CompileError::Syntax(SyntaxError::UnclosedGroup { pos: 0 })
    );
}

#[test]
fn errors_render() {
    let err = compile("(ab|bb").unwrap_err();
    assert_eq!(err.to_string(), "syntax error: unclosed group opened at offset 0");
    assert!(std::error::Error::source(&err).is_some());

    let err = compile("a{2}").unwrap_err();
    assert_eq!(err.to_string(), "unsupported pattern syntax '{' at offset 1");

    let err = Compiler::new().size_limit(Some(3)).compile("ab").unwrap_err();
    assert_eq!(err.to_string(), "regex pattern is too complex (more than 3 states)");
}

#[test]
fn manual_epsilon_self_loop() {
    let mut nfa = star(concat(literal(b'a'), literal(b'b')));
    let (start, end) = (nfa.start(), nfa.end());
    nfa.add_epsilon_transition(start, start).unwrap();
    nfa.add_epsilon_transition(end, end).unwrap();

    assert!(nfa.matches(""));
    assert!(nfa.matches("abab"));
    assert!(!nfa.matches("aba"));
    assert!(Matcher::new(&nfa).is_match("abab"));
}

#[test]
fn wiring_outside_the_byte_range_fails() {
    let mut nfa = empty();
    let (start, end) = (nfa.start(), nfa.end());
    assert!(matches!(
        nfa.add_char_transition(start, 0x100, end),
        Err(CompileError::InvalidArgument(_))
    ));
    assert!(nfa.add_char_transition(start, 0xff, end).is_ok());
}

#[test]
fn composition_keeps_one_final_state() {
    let nfa = plus(union(star(literal(b'a')), concat(literal(b'b'), empty())));
    let finals: Vec<_> = nfa
        .states()
        .iter()
        .enumerate()
        .filter(|(_, state)| state.is_final())
        .map(|(id, _)| id)
        .collect();
    assert_eq!(finals, vec![nfa.end()]);
}

#[test]
fn concurrent_matching_on_a_shared_automaton() {
    let nfa = compile("(a|b)*abb").unwrap();
    let inputs = ["abb", "aabb", "babb", "ab", "abba", "bbbbabb"];

    std::thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|input| {
                let nfa = &nfa;
                scope.spawn(move || (input, nfa.matches(input)))
            })
            .collect();
        for handle in handles {
            let (input, matched) = handle.join().unwrap();
            assert_eq!(matched, input.ends_with("abb"), "{:?}", input);
        }
    });
}

#[test]
fn dump_lists_every_state() {
    let nfa = compile("ab").unwrap();
    let dump = nfa.to_string();
    assert!(dump.starts_with("start: 0\nend: 3\n"));
    assert!(dump.contains("'a' -> [1]"));
    assert!(dump.contains("ε -> [2]"));
    assert!(dump.contains("3 FINAL"));
    assert_eq!(dump.matches("FINAL").count(), 1);
}
