use std::fmt;
use std::sync::Arc;

/// The default cap on the number of DFA states built for one pattern.
pub const DEFAULT_STATE_LIMIT: usize = 10_000;

/// An optional sink for human-readable compiler diagnostics.
///
/// Each stage of [`compile_dfa`](crate::compile_dfa) hands it one message.
/// Messages are only formatted when a sink is installed.
#[derive(Clone, Default)]
pub struct Diagnostics {
    sink: Option<Arc<dyn Fn(&str) + Send + Sync>>,
}

impl Diagnostics {
    /// Create diagnostics that forward every message to `sink`.
    pub fn new<F>(sink: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        Self { sink: Some(Arc::new(sink)) }
    }

    /// Diagnostics that drop every message.
    pub fn none() -> Self {
        Self { sink: None }
    }

    /// Whether a sink is installed.
    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Build a message lazily and pass it to the sink, if any.
    pub fn emit<F: FnOnce() -> String>(&self, message: F) {
        if let Some(ref sink) = self.sink {
            sink(&message());
        }
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

/// Configuration for [`compile_dfa`](crate::compile_dfa).
#[derive(Clone, Debug)]
pub struct Config {
    state_limit: Option<usize>,
    diagnostics: Diagnostics,
}

impl Config {
    /// A configuration with the default state limit and no diagnostics.
    pub fn new() -> Self {
        Self {
            state_limit: Some(DEFAULT_STATE_LIMIT),
            diagnostics: Diagnostics::none(),
        }
    }

    /// Set the maximum number of DFA states. `None` removes the limit.
    pub fn state_limit(mut self, limit: Option<usize>) -> Self {
        self.state_limit = limit;
        self
    }

    /// Install a diagnostics sink.
    pub fn diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn get_state_limit(&self) -> Option<usize> {
        self.state_limit
    }

    pub fn get_diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
