//! Filter-expression abstract syntax tree.
//!
//! One closed [`Node`] enum with a variant per grammar production. Every node
//! owns its children exclusively; the tree is built once by the parser and is
//! never mutated afterwards. Downstream translators (query builders, ORMs)
//! are expected to `match` over [`Node`] exhaustively.

pub mod display;
pub mod visit;

use serde::Serialize;

/// A parsed filter expression node.
///
/// `Or` and `And` only ever appear with two or more operands when produced by
/// the parser; single-operand productions collapse to the operand itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    /// Root of every parsed expression.
    Filter { body: Box<Node> },
    /// Disjunction of two or more terms.
    Or { terms: Vec<Node> },
    /// Conjunction of two or more factors.
    And { factors: Vec<Node> },
    /// Negated factor (`NOT ...`).
    Not { inner: Box<Node> },
    /// Parenthesized sub-expression, kept so the structure stays visible.
    Group { inner: Box<Node> },
    /// `left op right` where both operands are primaries.
    Comparison {
        left: Box<Node>,
        op: CompOp,
        right: Box<Node>,
    },
    /// `subject [NOT] BETWEEN low AND high`.
    Between {
        subject: Identifier,
        not: bool,
        low: Box<Node>,
        high: Box<Node>,
    },
    /// `subject [NOT] LIKE pattern`; the pattern is an identifier or a string literal.
    Like {
        subject: Identifier,
        not: bool,
        pattern: Box<Node>,
    },
    /// `subject [NOT] IN (v1, v2, ...)`; `values` is never empty.
    In {
        subject: Identifier,
        not: bool,
        values: Vec<Literal>,
    },
    /// `subject IS [NOT] NULL`.
    IsNull { subject: Identifier, not: bool },
    /// Bare field reference.
    Identifier(Identifier),
    /// Typed literal.
    Literal(Literal),
}

/// Unqualified field reference, exactly as scanned from the input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Identifier {
    pub name: String,
}

impl Identifier {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Literal category. Integer and float spellings both map to [`LiteralKind::Numeric`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LiteralKind {
    String,
    Numeric,
    Boolean,
}

/// A literal value kept in its lexical form.
///
/// `raw` is the unescaped text for strings and the original spelling for
/// numbers and booleans. Coercion to native types is up to the consumer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Literal {
    pub kind: LiteralKind,
    pub raw: String,
}

impl Literal {
    #[must_use]
    pub fn new(kind: LiteralKind, raw: impl Into<String>) -> Self {
        Self {
            kind,
            raw: raw.into(),
        }
    }

    #[must_use]
    pub fn string(raw: impl Into<String>) -> Self {
        Self::new(LiteralKind::String, raw)
    }

    #[must_use]
    pub fn numeric(raw: impl Into<String>) -> Self {
        Self::new(LiteralKind::Numeric, raw)
    }

    #[must_use]
    pub fn boolean(raw: impl Into<String>) -> Self {
        Self::new(LiteralKind::Boolean, raw)
    }

    /// True for numeric literals spelled with a decimal point or an exponent.
    #[must_use]
    pub fn is_float_like(&self) -> bool {
        self.kind == LiteralKind::Numeric && self.raw.contains(['.', 'e', 'E'])
    }

    /// Boolean value of a `TRUE`/`FALSE` literal (any letter case).
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        if self.kind != LiteralKind::Boolean {
            return None;
        }
        if self.raw.eq_ignore_ascii_case("true") {
            Some(true)
        } else if self.raw.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }
}

/// Comparison operator. `!=` in the input is normalized to [`CompOp::Ne`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CompOp {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = "<>")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
}

impl CompOp {
    /// Canonical SQL spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Ne => "<>",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

impl Node {
    /// Wrap `body` in a [`Node::Filter`] root.
    #[must_use]
    pub fn filter(body: Self) -> Self {
        Self::Filter {
            body: Box::new(body),
        }
    }

    #[must_use]
    pub fn identifier(name: impl Into<String>) -> Self {
        Self::Identifier(Identifier::new(name))
    }

    #[must_use]
    pub fn literal(literal: Literal) -> Self {
        Self::Literal(literal)
    }

    #[must_use]
    pub fn negated(inner: Self) -> Self {
        Self::Not {
            inner: Box::new(inner),
        }
    }

    #[must_use]
    pub fn group(inner: Self) -> Self {
        Self::Group {
            inner: Box::new(inner),
        }
    }

    #[must_use]
    pub fn comparison(left: Self, op: CompOp, right: Self) -> Self {
        Self::Comparison {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// Build a disjunction, collapsing a single term to the term itself.
    #[must_use]
    pub fn or(terms: Vec<Self>) -> Self {
        match <[Self; 1]>::try_from(terms) {
            Ok([single]) => single,
            Err(terms) => Self::Or { terms },
        }
    }

    /// Build a conjunction, collapsing a single factor to the factor itself.
    #[must_use]
    pub fn and(factors: Vec<Self>) -> Self {
        match <[Self; 1]>::try_from(factors) {
            Ok([single]) => single,
            Err(factors) => Self::And { factors },
        }
    }

    /// Body of a [`Node::Filter`] root, or `self` for any other node.
    #[must_use]
    pub fn body(&self) -> &Self {
        match self {
            Self::Filter { body } => body,
            other => other,
        }
    }

    /// Short variant name, handy in logs and error messages.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Filter { .. } => "filter",
            Self::Or { .. } => "or",
            Self::And { .. } => "and",
            Self::Not { .. } => "not",
            Self::Group { .. } => "group",
            Self::Comparison { .. } => "comparison",
            Self::Between { .. } => "between",
            Self::Like { .. } => "like",
            Self::In { .. } => "in",
            Self::IsNull { .. } => "is_null",
            Self::Identifier(_) => "identifier",
            Self::Literal(_) => "literal",
        }
    }
}
