//! Token types produced by the [`Lexer`](crate::Lexer).

use std::fmt;

/// Lexical category of a token.
///
/// Variants are ordered so that every kind at or after [`TokenKind::Identifier`]
/// is spelled like an identifier: the keywords follow it. [`TokenKind::is_identifier_like`]
/// relies on this ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenKind {
    /// Conceptual end of input; never stored in the token buffer.
    EndOfInput,
    /// A lexeme no rule classified (stray punctuation, placeholders, bad numbers).
    None,
    Integer,
    Float,
    String,
    OpenParen,
    CloseParen,
    Comma,
    Equals,
    GreaterThan,
    LowerThan,
    Negate,

    Identifier,
    And,
    Between,
    False,
    In,
    Is,
    Like,
    Not,
    Null,
    Or,
    True,
}

/// Keyword spellings, matched case-insensitively against scanned identifiers.
const KEYWORDS: [(&str, TokenKind); 10] = [
    ("AND", TokenKind::And),
    ("BETWEEN", TokenKind::Between),
    ("FALSE", TokenKind::False),
    ("IN", TokenKind::In),
    ("IS", TokenKind::Is),
    ("LIKE", TokenKind::Like),
    ("NOT", TokenKind::Not),
    ("NULL", TokenKind::Null),
    ("OR", TokenKind::Or),
    ("TRUE", TokenKind::True),
];

impl TokenKind {
    /// Resolve an identifier-shaped lexeme to a keyword kind, or `Identifier`.
    #[must_use]
    pub fn from_word(word: &str) -> Self {
        KEYWORDS
            .iter()
            .find(|(spelling, _)| spelling.eq_ignore_ascii_case(word))
            .map_or(Self::Identifier, |&(_, kind)| kind)
    }

    /// Whether this kind is a keyword.
    #[must_use]
    pub fn is_keyword(self) -> bool {
        self > Self::Identifier
    }

    /// Whether a token of this kind may stand where an identifier is expected:
    /// plain identifiers and keywords.
    #[must_use]
    pub fn is_identifier_like(self) -> bool {
        self >= Self::Identifier
    }

    /// Human-readable description used in "Expected ..." messages.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::EndOfInput => "end of string",
            Self::None => "unknown token",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
            Self::OpenParen => "'('",
            Self::CloseParen => "')'",
            Self::Comma => "','",
            Self::Equals => "'='",
            Self::GreaterThan => "'>'",
            Self::LowerThan => "'<'",
            Self::Negate => "'!'",
            Self::Identifier => "identifier",
            Self::And => "AND",
            Self::Between => "BETWEEN",
            Self::False => "FALSE",
            Self::In => "IN",
            Self::Is => "IS",
            Self::Like => "LIKE",
            Self::Not => "NOT",
            Self::Null => "NULL",
            Self::Or => "OR",
            Self::True => "TRUE",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A classified lexeme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Lexeme text; string literals are stored unquoted and unescaped.
    pub text: String,
    /// 0-based character offset of the lexeme's first character.
    pub offset: usize,
}

impl Token {
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<String>, offset: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_resolve_case_insensitively() {
        assert_eq!(TokenKind::from_word("and"), TokenKind::And);
        assert_eq!(TokenKind::from_word("BeTwEeN"), TokenKind::Between);
        assert_eq!(TokenKind::from_word("null"), TokenKind::Null);
        assert_eq!(TokenKind::from_word("True"), TokenKind::True);
        assert_eq!(TokenKind::from_word("status"), TokenKind::Identifier);
        assert_eq!(TokenKind::from_word("ANDY"), TokenKind::Identifier);
    }

    #[test]
    fn identifier_threshold_ordering() {
        assert!(TokenKind::Identifier.is_identifier_like());
        assert!(!TokenKind::Identifier.is_keyword());
        for (_, kind) in KEYWORDS {
            assert!(kind.is_keyword(), "{kind:?}");
            assert!(kind.is_identifier_like(), "{kind:?}");
        }
        for kind in [
            TokenKind::EndOfInput,
            TokenKind::None,
            TokenKind::Integer,
            TokenKind::String,
            TokenKind::OpenParen,
            TokenKind::Negate,
        ] {
            assert!(!kind.is_identifier_like(), "{kind:?}");
        }
    }
}
