use std::fmt;
use std::sync::Arc;

use thompson_dfa_compiler::{Matcher, DFA};

use crate::Match;

/// A compiled pattern.
///
/// Only the DFA survives compilation. It is immutable and shared behind an
/// `Arc`, so a `CompiledPattern` is cheap to clone and can be matched from
/// many threads at once.
#[derive(Clone)]
pub struct CompiledPattern {
    pattern: Arc<str>,
    dfa: Arc<DFA>,
}

impl CompiledPattern {
    pub(crate) fn new(pattern: &str, dfa: DFA) -> CompiledPattern {
        CompiledPattern {
            pattern: Arc::from(pattern),
            dfa: Arc::new(dfa),
        }
    }

    fn matcher(&self) -> Matcher<'_> {
        Matcher::new(&self.dfa)
    }

    /// Returns true if and only if the whole of `input` matches.
    ///
    /// ```
    /// let re = thompson_regex::compile("[0-9]")?;
    /// assert!(re.is_match("7"));
    /// assert!(!re.is_match("10"));
    /// # Ok::<(), thompson_regex::CompileError>(())
    /// ```
    pub fn is_match(&self, input: &str) -> bool {
        self.matcher().is_match(input)
    }

    /// Returns true if and only if some substring of `input` matches.
    pub fn search(&self, input: &str) -> bool {
        self.matcher().search(input)
    }

    /// Returns the leftmost-longest match in `input`, if any.
    ///
    /// ```
    /// let re = thompson_regex::compile("ab*")?;
    /// let found = re.find("xxabbx").unwrap();
    /// assert_eq!((found.start, found.end), (2, 5));
    /// # Ok::<(), thompson_regex::CompileError>(())
    /// ```
    pub fn find(&self, input: &str) -> Option<Match> {
        self.matcher().find(input)
    }

    /// Returns every successive non-overlapping match in `input`.
    pub fn find_iter(&self, input: &str) -> std::vec::IntoIter<Match> {
        self.matcher().find_all(input).into_iter()
    }

    /// The pattern this was compiled from.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// The number of DFA states, including the reject state.
    pub fn state_len(&self) -> usize {
        self.dfa.len()
    }

    /// The underlying DFA.
    pub fn dfa(&self) -> &DFA {
        &self.dfa
    }
}

impl fmt::Display for CompiledPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

impl fmt::Debug for CompiledPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CompiledPattern").field(&self.as_str()).finish()
    }
}
