use thompson_dfa_compiler::{compile_dfa, Config};

use crate::{CompileError, CompiledPattern, Diagnostics};

/// A configurable builder for a [`CompiledPattern`].
///
/// ```
/// use thompson_regex::{Builder, CompileError};
///
/// // `(a|b)*a(a|b)(a|b)(a|b)` needs dozens of DFA states.
/// let err = Builder::new("(a|b)*a(a|b)(a|b)(a|b)")
///     .dfa_state_limit(Some(8))
///     .build()
///     .unwrap_err();
/// assert_eq!(err, CompileError::StateLimitExceeded { limit: 8 });
/// ```
#[derive(Clone, Debug)]
pub struct Builder {
    pattern: String,
    config: Config,
}

impl Builder {
    /// Create a new builder with the default configuration for `pattern`.
    pub fn new(pattern: &str) -> Builder {
        Builder {
            pattern: pattern.to_string(),
            config: Config::new(),
        }
    }

    /// Compile the pattern.
    ///
    /// Returns the first error any compiler stage detects.
    pub fn build(&self) -> Result<CompiledPattern, CompileError> {
        let dfa = compile_dfa(&self.pattern, &self.config)?;
        Ok(CompiledPattern::new(&self.pattern, dfa))
    }

    /// Set the maximum number of DFA states, or `None` for no limit.
    ///
    /// When determinization would create more states than this,
    /// [`Builder::build`] fails with
    /// [`CompileError::StateLimitExceeded`]. The default is 10 000.
    pub fn dfa_state_limit(&mut self, limit: Option<usize>) -> &mut Builder {
        self.config = self.config.clone().state_limit(limit);
        self
    }

    /// Send a description of every compiler stage's output to
    /// `diagnostics`.
    pub fn diagnostics(&mut self, diagnostics: Diagnostics) -> &mut Builder {
        self.config = self.config.clone().diagnostics(diagnostics);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_default() {
        let re = Builder::new("a*").build().unwrap();
        assert!(re.is_match("aaa"));
        assert_eq!(re.as_str(), "a*");
    }

    #[test]
    fn test_builder_unlimited() {
        let re = Builder::new("(a|b)*a(a|b)(a|b)(a|b)")
            .dfa_state_limit(None)
            .build()
            .unwrap();
        assert!(re.is_match("babbb"));
        assert!(!re.is_match("bbbbb"));
    }

    #[test]
    fn test_builder_is_reusable() {
        let mut builder = Builder::new("x");
        builder.dfa_state_limit(Some(100));
        let first = builder.build().unwrap();
        let second = builder.build().unwrap();
        assert_eq!(first.state_len(), second.state_len());
    }
}
