//! Error model for the filter-expression parser.
//!
//! Parsing aborts on the first problem and surfaces it as a [`FilterError`]
//! value; no partial AST is ever returned. Offsets are 0-based character
//! positions into the original expression.

use thiserror::Error;

/// Minimum number of characters shown after the offending position in a
/// semantical error's `near '...'` excerpt.
const NEAR_MIN_CHARS: usize = 12;

/// Errors produced while turning a filter expression into an AST.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// Unexpected or missing token during parsing.
    #[error("[Syntax Error] col {offset}: Error: {message}")]
    Syntax {
        /// What was expected versus what was found.
        message: String,
        /// Character offset of the offending token (input length at end of string).
        offset: usize,
        /// The complete expression being parsed.
        expression: String,
    },

    /// Consumer-level validation failure. The grammar never raises this itself.
    #[error(
        "[Semantical Error] col {offset} near '{}': Error: {message}",
        near_excerpt(.expression, *.offset)
    )]
    Semantical {
        /// Human-readable description of the problem.
        message: String,
        /// Character offset the problem refers to.
        offset: usize,
        /// The complete expression being validated.
        expression: String,
    },
}

/// Result alias used across the filter-expression crates.
pub type Result<T, E = FilterError> = std::result::Result<T, E>;

impl FilterError {
    /// Build a syntax error for `expected` vs. the token text `found`.
    ///
    /// `found == None` means the input was exhausted.
    pub fn syntax(
        expression: impl Into<String>,
        expected: &str,
        found: Option<&str>,
        offset: usize,
    ) -> Self {
        let mut message = if expected.is_empty() {
            "Unexpected ".to_owned()
        } else {
            format!("Expected {expected}, got ")
        };
        match found {
            Some(text) => {
                message.push('\'');
                message.push_str(text);
                message.push('\'');
            }
            None => message.push_str("end of string."),
        }
        Self::Syntax {
            message,
            offset,
            expression: expression.into(),
        }
    }

    /// Build a syntax error with a free-form message.
    pub fn syntax_message(
        expression: impl Into<String>,
        message: impl Into<String>,
        offset: usize,
    ) -> Self {
        Self::Syntax {
            message: message.into(),
            offset,
            expression: expression.into(),
        }
    }

    /// Build a semantical error. Reserved for consumers validating a parsed AST.
    pub fn semantical(
        expression: impl Into<String>,
        message: impl Into<String>,
        offset: usize,
    ) -> Self {
        Self::Semantical {
            message: message.into(),
            offset,
            expression: expression.into(),
        }
    }

    /// Character offset the error refers to.
    #[must_use]
    pub const fn offset(&self) -> usize {
        match self {
            Self::Syntax { offset, .. } | Self::Semantical { offset, .. } => *offset,
        }
    }

    /// The expression that failed.
    #[must_use]
    pub fn expression(&self) -> &str {
        match self {
            Self::Syntax { expression, .. } | Self::Semantical { expression, .. } => expression,
        }
    }

    /// The bare message, without the category prefix or position.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Syntax { message, .. } | Self::Semantical { message, .. } => message,
        }
    }

    /// Whether this is a [`FilterError::Syntax`] error.
    #[must_use]
    pub const fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax { .. })
    }
}

/// Excerpt of `expression` starting at `offset`: at least
/// [`NEAR_MIN_CHARS`] characters, then up to the next space.
fn near_excerpt(expression: &str, offset: usize) -> String {
    let chars: Vec<char> = expression.chars().collect();
    let start = offset.min(chars.len());
    let search_from = (start + NEAR_MIN_CHARS).min(chars.len());
    let end = chars[search_from..]
        .iter()
        .position(|&c| c == ' ')
        .map_or_else(
            || (start + NEAR_MIN_CHARS).min(chars.len()),
            |idx| search_from + idx,
        );
    chars[start..end].iter().collect()
}
