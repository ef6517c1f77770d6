//! Read-only traversal helpers over [`Node`] trees.

use crate::{Identifier, Literal, Node};

impl Node {
    /// Direct child nodes, left to right.
    ///
    /// Predicate subjects and `IN` values are typed fields rather than nodes
    /// and are not included here; see [`Node::identifiers`] and
    /// [`Node::literals`].
    #[must_use]
    pub fn children(&self) -> Vec<&Self> {
        match self {
            Self::Filter { body } => vec![body],
            Self::Or { terms } => terms.iter().collect(),
            Self::And { factors } => factors.iter().collect(),
            Self::Not { inner } | Self::Group { inner } => vec![inner],
            Self::Comparison { left, right, .. } => vec![left, right],
            Self::Between { low, high, .. } => vec![low, high],
            Self::Like { pattern, .. } => vec![pattern],
            Self::In { .. } | Self::IsNull { .. } | Self::Identifier(_) | Self::Literal(_) => {
                Vec::new()
            }
        }
    }

    /// Pre-order traversal calling `visit` on this node and every descendant.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Self)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    /// Every field reference in source order, including predicate subjects.
    #[must_use]
    pub fn identifiers(&self) -> Vec<&Identifier> {
        let mut out = Vec::new();
        self.walk(&mut |node| match node {
            Self::Between { subject, .. }
            | Self::Like { subject, .. }
            | Self::In { subject, .. }
            | Self::IsNull { subject, .. } => out.push(subject),
            Self::Identifier(ident) => out.push(ident),
            _ => {}
        });
        out
    }

    /// Every literal in source order, including `IN` list values.
    #[must_use]
    pub fn literals(&self) -> Vec<&Literal> {
        let mut out = Vec::new();
        self.walk(&mut |node| match node {
            Self::In { values, .. } => out.extend(values.iter()),
            Self::Literal(lit) => out.push(lit),
            _ => {}
        });
        out
    }

    /// Height of the tree rooted here; a leaf has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self
            .children()
            .into_iter()
            .map(Self::depth)
            .max()
            .unwrap_or(0)
    }
}
