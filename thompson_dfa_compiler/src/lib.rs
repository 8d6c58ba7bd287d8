//! Thompson NFA to DFA compiler
//!
//! This library compiles a small regular expression language into a
//! deterministic finite automaton in three stages:
//!
//! - [`expand`] rewrites groups, bracket classes and digit ranges into a
//!   canonical grammar of symbols, concatenation, `|`, `*` and `()`.
//! - [`Compiler`] Thompson-constructs an [`NFA`] from the canonical pattern.
//! - [`Determinizer`] subset-constructs a [`DFA`] from the NFA.
//!
//! A [`Matcher`] then runs the DFA over an input one `char` at a time, so
//! matching is linear in the length of the input.
//!
//! ```
//! use thompson_dfa_compiler::{compile_dfa, Config, Matcher};
//!
//! let dfa = compile_dfa("(ab)*c", &Config::new()).unwrap();
//! let matcher = Matcher::new(&dfa);
//! assert!(matcher.is_match("ababc"));
//! assert!(!matcher.is_match("abac"));
//! ```

#[macro_use]
mod macros;

pub mod alphabet;
pub mod compiler;
pub mod config;
pub mod dfa;
pub mod expand;
pub mod matcher;
pub mod nfa;
pub mod stack;

pub use alphabet::Alphabet;
pub use compiler::Compiler;
pub use config::{Config, Diagnostics};
pub use dfa::{Determinizer, DFA};
pub use expand::{expand, gobble, Canonical};
pub use matcher::{Match, Matcher};
pub use nfa::{Fragment, State, StateId, Symbol, Transition, NFA};
pub use stack::Stack;

/// The result of running any stage of the compiler
pub type CompileResult<T> = Result<T, CompileError>;

/// Errors that can occur during compilation
///
/// Every `index` is a byte offset into the raw pattern given to
/// [`compile_dfa`] (or [`expand`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// A `(` without its `)`, or a `)` without its `(`
    UnbalancedGroup { index: usize },
    /// A `[` without its `]`, or a `]` without its `[`
    UnbalancedBracket { index: usize },
    /// A `-` that does not sit between two ascending digits inside
    /// brackets, or an operator character inside a bracket class
    MalformedRange { index: usize },
    /// A `|` or `*` that is missing an operand
    DanglingOperator { index: usize },
    /// An empty pattern or an empty group
    EmptyPattern { index: usize },
    /// Determinization produced more DFA states than allowed
    StateLimitExceeded { limit: usize },
}

impl CompileError {
    /// The pattern offset at which the error was detected, if it has one.
    pub fn index(&self) -> Option<usize> {
        match *self {
            CompileError::UnbalancedGroup { index }
            | CompileError::UnbalancedBracket { index }
            | CompileError::MalformedRange { index }
            | CompileError::DanglingOperator { index }
            | CompileError::EmptyPattern { index } => Some(index),
            CompileError::StateLimitExceeded { .. } => None,
        }
    }
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileError::UnbalancedGroup { index } => {
                write!(f, "unbalanced group delimiter at offset {}", index)
            }
            CompileError::UnbalancedBracket { index } => {
                write!(f, "unbalanced bracket at offset {}", index)
            }
            CompileError::MalformedRange { index } => {
                write!(f, "malformed range at offset {}", index)
            }
            CompileError::DanglingOperator { index } => {
                write!(f, "operator without operand at offset {}", index)
            }
            CompileError::EmptyPattern { index } => {
                write!(f, "empty pattern or group at offset {}", index)
            }
            CompileError::StateLimitExceeded { limit } => {
                write!(f, "DFA exceeds the limit of {} states", limit)
            }
        }
    }
}

impl std::error::Error for CompileError {}

/// Run the whole pipeline: expand, build the NFA and determinize it.
///
/// The canonical pattern and the NFA are dropped once the next stage has
/// consumed them; only the DFA is returned.
pub fn compile_dfa(pattern: &str, config: &Config) -> CompileResult<DFA> {
    let canonical = expand(pattern)?;
    debug!("expanded {:?} into {:?}", pattern, canonical.as_str());
    config.get_diagnostics().emit(|| format!("canonical: {}", canonical));

    let nfa = Compiler::new().compile(&canonical)?;
    debug!("built NFA with {} states", nfa.len());
    config.get_diagnostics().emit(|| format!("nfa: {} states\n{:?}", nfa.len(), nfa));
    drop(canonical);

    let dfa = Determinizer::new()
        .state_limit(config.get_state_limit())
        .determinize(&nfa)?;
    debug!("determinized into DFA with {} states", dfa.len());
    config.get_diagnostics().emit(|| format!("dfa: {} states\n{:?}", dfa.len(), dfa));
    Ok(dfa)
}
