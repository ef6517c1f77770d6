//! Recursive descent parser for filter expressions.
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! filter              ::= conditional_expr EOF
//! conditional_expr    ::= conditional_term ("OR" conditional_term)*
//! conditional_term    ::= conditional_factor ("AND" conditional_factor)*
//! conditional_factor  ::= ["NOT"] conditional_primary
//! conditional_primary ::= simple_expr | "(" conditional_expr ")"
//! simple_expr         ::= between | like | in | is_null | comparison
//! between             ::= ident ["NOT"] "BETWEEN" primary "AND" primary
//! like                ::= ident ["NOT"] "LIKE" (ident | string)
//! in                  ::= ident ["NOT"] "IN" "(" literal ("," literal)* ")"
//! is_null             ::= ident "IS" ["NOT"] "NULL"
//! comparison          ::= primary comp_op primary
//! primary             ::= literal | ident
//! literal             ::= string | integer | float | TRUE | FALSE
//! comp_op             ::= "=" | "<" | "<=" | "<>" | ">" | ">=" | "!="
//! ```
//!
//! One token of lookahead drives every decision except two finite forward
//! scans on the lexer's peek cursor: finding what follows a matching `)`,
//! and finding the keyword that picks the kind of a simple expression.

use std::sync::atomic::{AtomicU64, Ordering};

use filterql_ast::{CompOp, Identifier, Literal, LiteralKind, Node};
use filterql_error::{FilterError, Result};
use tracing::debug;

use crate::config::ParserConfig;
use crate::lexer::Lexer;
use crate::token::TokenKind;

/// Single-use parser over one expression.
///
/// Holds mutable cursor state; use one instance per parse, or call
/// [`Parser::free`] before parsing again.
#[derive(Debug, Clone)]
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    config: ParserConfig,
    depth: usize,
    max_depth_seen: usize,
}

impl<'a> Parser<'a> {
    #[must_use]
    pub fn new(expression: &'a str) -> Self {
        Self::with_config(expression, ParserConfig::default())
    }

    #[must_use]
    pub fn with_config(expression: &'a str, config: ParserConfig) -> Self {
        Self {
            lexer: Lexer::new(expression),
            config,
            depth: 0,
            max_depth_seen: 0,
        }
    }

    /// The expression being parsed.
    #[must_use]
    pub const fn expression(&self) -> &'a str {
        self.lexer.input()
    }

    #[must_use]
    pub const fn lexer(&self) -> &Lexer<'a> {
        &self.lexer
    }

    #[must_use]
    pub const fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse the whole expression into a [`Node::Filter`] root.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::Syntax`] on the first unexpected or missing
    /// token, including trailing input after a complete expression.
    pub fn parse(&mut self) -> Result<Node> {
        self.depth = 0;
        self.max_depth_seen = 0;

        let result = self.filter_language();
        record_parse(result.is_ok(), self.max_depth_seen);

        match &result {
            Ok(_) => debug!(
                expression_len = self.expression().len(),
                token_count = self.lexer.tokens().len(),
                max_depth = self.max_depth_seen,
                "filter expression parsed"
            ),
            Err(err) => debug!(
                offset = err.offset(),
                message = %err.message(),
                "filter expression rejected"
            ),
        }
        result
    }

    /// Rewind so the parser can be reused.
    ///
    /// Moves the lexer back to token index `position` and forgets the current
    /// and lookahead tokens. With `deep`, the peek cursor is reset as well.
    pub fn free(&mut self, deep: bool, position: usize) {
        self.lexer.reset_position(position);
        if deep {
            self.lexer.reset_peek();
        }
        self.lexer.clear();
        self.depth = 0;
    }

    /// Consume the lookahead if it has kind `kind`.
    ///
    /// Expecting [`TokenKind::Identifier`] also accepts keyword tokens, which
    /// are spelled like identifiers.
    ///
    /// # Errors
    ///
    /// Returns a syntax error naming `kind` when the lookahead does not match.
    pub fn match_token(&mut self, kind: TokenKind) -> Result<()> {
        let lookahead = self.lexer.lookahead_kind();
        let accepted = lookahead == kind
            || (kind == TokenKind::Identifier && lookahead.is_identifier_like());
        if !accepted {
            return Err(self.syntax_error(kind.describe()));
        }
        self.lexer.advance();
        Ok(())
    }

    /// Syntax error against the current lookahead.
    fn syntax_error(&self, expected: &str) -> FilterError {
        let (found, offset) = self.lookahead_position();
        FilterError::syntax(self.expression(), expected, found, offset)
    }

    /// Lookahead text and offset; the input length stands in at end of input.
    fn lookahead_position(&self) -> (Option<&str>, usize) {
        self.lexer.lookahead().map_or_else(
            || (None, self.lexer.end_offset()),
            |t| (Some(t.text.as_str()), t.offset),
        )
    }

    /// Text of the token consumed last.
    fn consumed_text(&self) -> String {
        self.lexer
            .current()
            .map(|t| t.text.clone())
            .unwrap_or_default()
    }

    fn match_optional(&mut self, kind: TokenKind) -> Result<bool> {
        if self.lexer.is_next_token(kind) {
            self.match_token(kind)?;
            return Ok(true);
        }
        Ok(false)
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        self.max_depth_seen = self.max_depth_seen.max(self.depth);
        if self.depth > self.config.max_depth {
            let (_, offset) = self.lookahead_position();
            return Err(FilterError::syntax_message(
                self.expression(),
                format!("maximum nesting depth {} exceeded", self.config.max_depth),
                offset,
            ));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Kind of the next peeked token and whether it is a lone `.`.
    fn peek_kind(&mut self) -> (TokenKind, bool) {
        self.lexer
            .peek()
            .map_or((TokenKind::EndOfInput, false), |t| (t.kind, t.text == "."))
    }

    /// With the lookahead on `(`, return the kind of the token right after
    /// the matching `)`. The peek cursor is reset afterwards.
    fn peek_beyond_closing_parenthesis(&mut self) -> TokenKind {
        let mut token = self.peek_kind().0;
        let mut unmatched = 1_usize;

        while unmatched > 0 && token != TokenKind::EndOfInput {
            match token {
                TokenKind::OpenParen => unmatched += 1,
                TokenKind::CloseParen => unmatched -= 1,
                _ => {}
            }
            token = self.peek_kind().0;
        }

        self.lexer.reset_peek();
        token
    }

    // -----------------------------------------------------------------------
    // Productions
    // -----------------------------------------------------------------------

    /// filter ::= conditional_expr EOF
    fn filter_language(&mut self) -> Result<Node> {
        self.lexer.advance();

        let body = self.conditional_expression()?;

        if self.lexer.lookahead().is_some() {
            return Err(self.syntax_error("end of string"));
        }
        Ok(Node::filter(body))
    }

    /// conditional_expr ::= conditional_term ("OR" conditional_term)*
    fn conditional_expression(&mut self) -> Result<Node> {
        self.enter()?;

        let mut terms = vec![self.conditional_term()?];
        while self.lexer.is_next_token(TokenKind::Or) {
            self.match_token(TokenKind::Or)?;
            terms.push(self.conditional_term()?);
        }

        self.leave();
        Ok(Node::or(terms))
    }

    /// conditional_term ::= conditional_factor ("AND" conditional_factor)*
    fn conditional_term(&mut self) -> Result<Node> {
        let mut factors = vec![self.conditional_factor()?];
        while self.lexer.is_next_token(TokenKind::And) {
            self.match_token(TokenKind::And)?;
            factors.push(self.conditional_factor()?);
        }
        Ok(Node::and(factors))
    }

    /// conditional_factor ::= ["NOT"] conditional_primary
    fn conditional_factor(&mut self) -> Result<Node> {
        if !self.match_optional(TokenKind::Not)? {
            return self.conditional_primary();
        }

        self.enter()?;
        let primary = self.conditional_primary()?;
        self.leave();
        Ok(Node::negated(primary))
    }

    /// conditional_primary ::= simple_expr | "(" conditional_expr ")"
    fn conditional_primary(&mut self) -> Result<Node> {
        if !self.lexer.is_next_token(TokenKind::OpenParen) {
            return self.simple_conditional_expression();
        }

        // A comparison symbol or predicate keyword after the matching `)`
        // means the parenthesis belongs to a simple expression operand.
        let beyond = self.peek_beyond_closing_parenthesis();
        if matches!(
            beyond,
            TokenKind::Equals
                | TokenKind::LowerThan
                | TokenKind::GreaterThan
                | TokenKind::Not
                | TokenKind::Between
                | TokenKind::Like
                | TokenKind::In
                | TokenKind::Is
        ) {
            return self.simple_conditional_expression();
        }

        self.match_token(TokenKind::OpenParen)?;
        let inner = self.conditional_expression()?;
        self.match_token(TokenKind::CloseParen)?;
        Ok(Node::group(inner))
    }

    /// simple_expr ::= between | like | in | is_null | comparison
    ///
    /// Peeks past the leading identifier (and an optional `NOT`) for the
    /// keyword that decides the production.
    fn simple_conditional_expression(&mut self) -> Result<Node> {
        let mut token = self.lexer.lookahead_kind();
        let mut after = token;

        if token == TokenKind::Not {
            token = self.lexer.glimpse().map_or(TokenKind::EndOfInput, |t| t.kind);
        }

        if token == TokenKind::Identifier {
            let (mut kind, mut is_dot) = self.peek_kind();
            while is_dot {
                self.lexer.peek();
                (kind, is_dot) = self.peek_kind();
            }
            token = kind;

            if token == TokenKind::Not {
                token = self.peek_kind().0;
            }

            // IS needs one more token to tell NULL apart.
            after = self.peek_kind().0;
            if after == TokenKind::Not {
                after = self.peek_kind().0;
            }

            self.lexer.reset_peek();
        }

        match token {
            TokenKind::Between => self.between_expression(),
            TokenKind::Like => self.like_expression(),
            TokenKind::In => self.in_expression(),
            TokenKind::Is if after == TokenKind::Null => self.null_comparison_expression(),
            _ => self.comparison_expression(),
        }
    }

    /// between ::= ident ["NOT"] "BETWEEN" primary "AND" primary
    fn between_expression(&mut self) -> Result<Node> {
        let subject = self.identification_variable()?;
        let not = self.match_optional(TokenKind::Not)?;

        self.match_token(TokenKind::Between)?;
        let low = self.arithmetic_primary()?;
        self.match_token(TokenKind::And)?;
        let high = self.arithmetic_primary()?;

        Ok(Node::Between {
            subject,
            not,
            low: Box::new(low),
            high: Box::new(high),
        })
    }

    /// comparison ::= primary comp_op primary
    fn comparison_expression(&mut self) -> Result<Node> {
        let left = self.arithmetic_primary()?;
        let op = self.comparison_operator()?;
        let right = self.arithmetic_primary()?;
        Ok(Node::comparison(left, op, right))
    }

    /// in ::= ident ["NOT"] "IN" "(" literal ("," literal)* ")"
    fn in_expression(&mut self) -> Result<Node> {
        let subject = self.identification_variable()?;
        let not = self.match_optional(TokenKind::Not)?;

        self.match_token(TokenKind::In)?;
        self.match_token(TokenKind::OpenParen)?;

        let mut values = vec![self.literal()?];
        while self.lexer.is_next_token(TokenKind::Comma) {
            self.match_token(TokenKind::Comma)?;
            values.push(self.literal()?);
        }

        self.match_token(TokenKind::CloseParen)?;

        Ok(Node::In {
            subject,
            not,
            values,
        })
    }

    /// like ::= ident ["NOT"] "LIKE" (ident | string)
    fn like_expression(&mut self) -> Result<Node> {
        let subject = self.identification_variable()?;
        let not = self.match_optional(TokenKind::Not)?;

        self.match_token(TokenKind::Like)?;
        let pattern = self.string_expression()?;

        Ok(Node::Like {
            subject,
            not,
            pattern: Box::new(pattern),
        })
    }

    /// is_null ::= ident "IS" ["NOT"] "NULL"
    fn null_comparison_expression(&mut self) -> Result<Node> {
        let subject = self.identification_variable()?;

        self.match_token(TokenKind::Is)?;
        let not = self.match_optional(TokenKind::Not)?;
        self.match_token(TokenKind::Null)?;

        Ok(Node::IsNull { subject, not })
    }

    /// comp_op ::= "=" | "<" | "<=" | "<>" | ">" | ">=" | "!="
    fn comparison_operator(&mut self) -> Result<CompOp> {
        match self.lexer.lookahead_kind() {
            TokenKind::Equals => {
                self.match_token(TokenKind::Equals)?;
                Ok(CompOp::Eq)
            }
            TokenKind::LowerThan => {
                self.match_token(TokenKind::LowerThan)?;
                if self.match_optional(TokenKind::Equals)? {
                    Ok(CompOp::Le)
                } else if self.match_optional(TokenKind::GreaterThan)? {
                    Ok(CompOp::Ne)
                } else {
                    Ok(CompOp::Lt)
                }
            }
            TokenKind::GreaterThan => {
                self.match_token(TokenKind::GreaterThan)?;
                if self.match_optional(TokenKind::Equals)? {
                    Ok(CompOp::Ge)
                } else {
                    Ok(CompOp::Gt)
                }
            }
            TokenKind::Negate => {
                self.match_token(TokenKind::Negate)?;
                self.match_token(TokenKind::Equals)?;
                Ok(CompOp::Ne)
            }
            _ => Err(self.syntax_error("=, <, <=, <>, >, >=, !=")),
        }
    }

    /// primary ::= literal | ident
    fn arithmetic_primary(&mut self) -> Result<Node> {
        if self.lexer.is_next_token(TokenKind::Identifier) {
            return Ok(Node::Identifier(self.identification_variable()?));
        }
        Ok(Node::Literal(self.literal()?))
    }

    /// literal ::= string | integer | float | TRUE | FALSE
    fn literal(&mut self) -> Result<Literal> {
        let token = self.lexer.lookahead_kind();
        let kind = match token {
            TokenKind::String => LiteralKind::String,
            TokenKind::Integer | TokenKind::Float => LiteralKind::Numeric,
            TokenKind::True | TokenKind::False => LiteralKind::Boolean,
            _ => return Err(self.syntax_error("Literal")),
        };
        self.match_token(token)?;
        Ok(Literal::new(kind, self.consumed_text()))
    }

    fn identification_variable(&mut self) -> Result<Identifier> {
        self.match_token(TokenKind::Identifier)?;
        Ok(Identifier::new(self.consumed_text()))
    }

    /// ident | string
    fn string_expression(&mut self) -> Result<Node> {
        match self.lexer.lookahead_kind() {
            TokenKind::Identifier => Ok(Node::Identifier(self.identification_variable()?)),
            TokenKind::String => {
                self.match_token(TokenKind::String)?;
                Ok(Node::Literal(Literal::string(self.consumed_text())))
            }
            _ => Err(self.syntax_error("identifier | string")),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse metrics
// ---------------------------------------------------------------------------

static PARSES_TOTAL: AtomicU64 = AtomicU64::new(0);
static SYNTAX_ERRORS_TOTAL: AtomicU64 = AtomicU64::new(0);
static MAX_DEPTH_OBSERVED: AtomicU64 = AtomicU64::new(0);

/// Snapshot of process-wide parse counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseMetricsSnapshot {
    pub parses_total: u64,
    pub syntax_errors_total: u64,
    /// Deepest nesting reached by any parse since the last reset.
    pub max_depth_observed: u64,
}

fn record_parse(ok: bool, depth: usize) {
    PARSES_TOTAL.fetch_add(1, Ordering::Relaxed);
    if !ok {
        SYNTAX_ERRORS_TOTAL.fetch_add(1, Ordering::Relaxed);
    }
    let depth = u64::try_from(depth).unwrap_or(u64::MAX);
    MAX_DEPTH_OBSERVED.fetch_max(depth, Ordering::Relaxed);
}

/// Return a snapshot of the parse counters.
#[must_use]
pub fn parse_metrics_snapshot() -> ParseMetricsSnapshot {
    ParseMetricsSnapshot {
        parses_total: PARSES_TOTAL.load(Ordering::Relaxed),
        syntax_errors_total: SYNTAX_ERRORS_TOTAL.load(Ordering::Relaxed),
        max_depth_observed: MAX_DEPTH_OBSERVED.load(Ordering::Relaxed),
    }
}

/// Reset all parse counters.
pub fn reset_parse_metrics() {
    PARSES_TOTAL.store(0, Ordering::Relaxed);
    SYNTAX_ERRORS_TOTAL.store(0, Ordering::Relaxed);
    MAX_DEPTH_OBSERVED.store(0, Ordering::Relaxed);
}
