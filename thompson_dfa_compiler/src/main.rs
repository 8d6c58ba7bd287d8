use std::process::ExitCode;

use clap::Parser;
use thompson_dfa_compiler::{compile_dfa, expand, Compiler, Config, Diagnostics, Matcher};

/// Compile a pattern to a DFA and run it against each input.
#[derive(Parser, Debug)]
#[command(name = "thompson-dfa", version)]
struct Args {
    /// The pattern to compile
    pattern: String,

    /// Inputs to match against the pattern
    inputs: Vec<String>,

    /// Report the leftmost-longest match anywhere in each input instead of
    /// requiring the whole input to match
    #[arg(long)]
    search: bool,

    /// Print the NFA and DFA
    #[arg(long)]
    dump: bool,

    /// Print what every compiler stage produced to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Maximum number of DFA states, 0 for no limit
    #[arg(long, default_value_t = thompson_dfa_compiler::config::DEFAULT_STATE_LIMIT)]
    state_limit: usize,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let mut config = Config::new().state_limit(match args.state_limit {
        0 => None,
        limit => Some(limit),
    });
    if args.verbose {
        config = config.diagnostics(Diagnostics::new(|line: &str| eprintln!("{}", line)));
    }

    println!("=== Pattern: '{}' ===", args.pattern);
    let dfa = match compile_dfa(&args.pattern, &config) {
        Ok(dfa) => dfa,
        Err(e) => {
            eprintln!("Failed to compile: {}", e);
            return ExitCode::from(2);
        }
    };

    if args.dump {
        print_automata(&args.pattern);
        println!("{:?}", dfa);
    }

    let matcher = Matcher::new(&dfa);
    let mut all_matched = true;
    for input in &args.inputs {
        if args.search {
            match matcher.find(input) {
                Some(found) => println!("{:?}: match {:?} {:?}", input, found.range(), &input[found.range()]),
                None => {
                    all_matched = false;
                    println!("{:?}: no match", input);
                }
            }
        } else {
            let matched = matcher.is_match(input);
            all_matched &= matched;
            println!("{:?}: {}", input, if matched { "match" } else { "no match" });
        }
    }

    if all_matched {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Print the canonical pattern and the NFA the DFA was built from.
fn print_automata(pattern: &str) {
    // Both already succeeded inside compile_dfa.
    let Ok(canonical) = expand(pattern) else { return };
    println!("Canonical: {}", canonical);
    if let Ok(nfa) = Compiler::new().compile(&canonical) {
        println!("Start state: {}", nfa.start);
        println!("Accepting state: {}", nfa.accept);
        println!("{:?}", nfa);
    }
}
