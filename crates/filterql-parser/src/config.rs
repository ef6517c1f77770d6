//! Parser configuration.

use serde::{Deserialize, Serialize};

/// Default limit on expression nesting; see [`ParserConfig::max_depth`].
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Tunables for a [`Parser`](crate::Parser).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Maximum nesting depth. Every conditional expression (the top level
    /// and each parenthesized group) and every `NOT` factor counts one level.
    /// Deeper input is rejected with a syntax error instead of recursing further.
    pub max_depth: usize,
}

impl ParserConfig {
    /// Configuration with the nesting guard disabled.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            max_depth: usize::MAX,
        }
    }

    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
