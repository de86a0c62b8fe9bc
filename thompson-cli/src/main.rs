use std::process;

use anyhow::Context;
use thompson::{alt, compile, seq, star, Automaton, Piece};

/// Inputs every demo pattern is run against.
const CANDIDATES: &[&str] = &[
    "",               // empty string
    "ab",             // 'a' followed by 'b'
    "bb",             // 'b' followed by 'b'
    "a",              // only character 'a'
    "abbb",           // 'ab' followed by 'bb'
    "bbab",           // 'bb' followed by 'ab'
    "baba",           // 'ba' followed by 'ba'
    "bbbbbbababbbbb", // thrice 'bb', twice 'ab', then twice 'bb'
    "bc",             // 'b' followed by 'c'
    "abbc",           // 'ab' followed by 'bc'
];

fn print_usage() {
    eprintln!(
        "\
Usage: thompson <COMMAND>

Commands:
  dump  <pattern>             Print the NFA a pattern compiles to
  match <pattern> <input>...  Match a pattern against whole inputs
  demo                        Run the built-in experiments

Set RUST_LOG=thompson=trace to see the compiler and matcher at work."
    );
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        print_usage();
        process::exit(1);
    };

    log::debug!("running {:?} with {} arguments", command, rest.len());
    match (command.as_str(), rest) {
        ("-h" | "--help", _) => print_usage(),
        ("dump", [pattern]) => {
            let nfa = compile_pattern(pattern)?;
            println!("=== Pattern: '{}' ===", pattern);
            print!("{}", nfa);
        }
        ("match", [pattern, inputs @ ..]) if !inputs.is_empty() => {
            let nfa = compile_pattern(pattern)?;
            for input in inputs {
                println!("{} {}", input, nfa.matches(input));
            }
        }
        ("demo", []) => demo()?,
        _ => {
            print_usage();
            process::exit(1);
        }
    }
    Ok(())
}

fn compile_pattern(pattern: &str) -> anyhow::Result<Automaton> {
    compile(pattern).with_context(|| format!("failed to compile pattern {:?}", pattern))
}

fn print_msg(message: &str) {
    let padding = "-".repeat(20);
    println!("{} {} {}", padding, message, padding);
}

fn run_experiment(title: &str, nfa: &Automaton) {
    print_msg(&format!("Regex: {}", title));
    for candidate in CANDIDATES {
        println!("{} {}", candidate, nfa.matches(candidate));
    }
    println!();
}

fn demo() -> anyhow::Result<()> {
    for pattern in ["(ab|bb)*", "(ab|bb)+", "(ab|bb)*bc"] {
        run_experiment(pattern, &compile_pattern(pattern)?);
    }

    // The same automata assembled straight from the construction operators.
    let ab_or_bb = || alt(vec!["ab".into(), "bb".into()]);
    let one_or_more = seq(vec![ab_or_bb()?.into(), star(ab_or_bb()?).into()])?;
    run_experiment("(ab|bb)+ (by hand)", &one_or_more);

    // No bounded repetition syntax, so spell out every allowed count.
    let (min, max) = (3, 4);
    let counts: Vec<Piece> = (min..=max).map(|n| Piece::from("b".repeat(n))).collect();
    let bounded = seq(vec!["a".into(), alt(counts)?.into()])?;
    run_experiment("ab{3,4} (by hand)", &bounded);

    Ok(())
}
