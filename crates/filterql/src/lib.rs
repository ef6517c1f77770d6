// Public API facade for the filter-expression parser.
//
// Re-exports the AST, error, and parser crates and offers one-call entry
// points. Each call builds a fresh `Parser`; no state is shared between
// parses apart from the process-wide metrics counters.

pub use filterql_ast::{CompOp, Identifier, Literal, LiteralKind, Node};
pub use filterql_error::{FilterError, Result};
pub use filterql_parser::{
    DEFAULT_MAX_DEPTH, Lexer, ParseMetricsSnapshot, Parser, ParserConfig, Token, TokenKind,
    TokenizeDurationSecondsHistogram, TokenizeMetricsSnapshot, parse_metrics_snapshot,
    reset_parse_metrics, reset_tokenize_metrics, tokenize, tokenize_metrics_snapshot,
};

/// Parse a filter expression with the default configuration.
///
/// ```
/// let tree = filterql::parse("age >= 18 AND status IN ('active', 'trial')").unwrap();
/// assert_eq!(tree.identifiers().len(), 2);
/// ```
///
/// # Errors
///
/// Returns [`FilterError::Syntax`] describing the first offending token.
pub fn parse(expression: &str) -> Result<Node> {
    parse_with_config(expression, ParserConfig::default())
}

/// Parse a filter expression with an explicit [`ParserConfig`].
///
/// # Errors
///
/// Returns [`FilterError::Syntax`] describing the first offending token, or
/// when the expression nests deeper than `config.max_depth`.
pub fn parse_with_config(expression: &str, config: ParserConfig) -> Result<Node> {
    tracing::trace!(expression_len = expression.len(), max_depth = config.max_depth, "parse");
    Parser::with_config(expression, config).parse()
}

/// Parse and render back to canonical single-line text.
///
/// # Errors
///
/// Propagates any parse error.
pub fn normalize(expression: &str) -> Result<String> {
    parse(expression).map(|tree| tree.to_string())
}
