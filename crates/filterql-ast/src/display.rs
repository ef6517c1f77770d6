//! Canonical text rendering of filter ASTs.
//!
//! Keywords are uppercased, `!=` comes out as `<>`, strings are re-quoted with
//! `''` escaping and groups keep their parentheses. Rendering a parser-built
//! tree and parsing the result again yields the same tree.

use std::fmt;

use crate::{CompOp, Identifier, Literal, LiteralKind, Node};

impl fmt::Display for CompOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            LiteralKind::String => {
                f.write_str("'")?;
                for (i, chunk) in self.raw.split('\'').enumerate() {
                    if i > 0 {
                        f.write_str("''")?;
                    }
                    f.write_str(chunk)?;
                }
                f.write_str("'")
            }
            LiteralKind::Numeric | LiteralKind::Boolean => f.write_str(&self.raw),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, nodes: &[Node], sep: &str) -> fmt::Result {
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{node}")?;
    }
    Ok(())
}

const fn not_prefix(not: bool) -> &'static str {
    if not { "NOT " } else { "" }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filter { body } => write!(f, "{body}"),
            Self::Or { terms } => write_joined(f, terms, " OR "),
            Self::And { factors } => write_joined(f, factors, " AND "),
            Self::Not { inner } => write!(f, "NOT {inner}"),
            Self::Group { inner } => write!(f, "({inner})"),
            Self::Comparison { left, op, right } => write!(f, "{left} {op} {right}"),
            Self::Between {
                subject,
                not,
                low,
                high,
            } => write!(f, "{subject} {}BETWEEN {low} AND {high}", not_prefix(*not)),
            Self::Like {
                subject,
                not,
                pattern,
            } => write!(f, "{subject} {}LIKE {pattern}", not_prefix(*not)),
            Self::In {
                subject,
                not,
                values,
            } => {
                write!(f, "{subject} {}IN (", not_prefix(*not))?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str(")")
            }
            Self::IsNull { subject, not } => {
                write!(f, "{subject} IS {}NULL", not_prefix(*not))
            }
            Self::Identifier(ident) => write!(f, "{ident}"),
            Self::Literal(lit) => write!(f, "{lit}"),
        }
    }
}
