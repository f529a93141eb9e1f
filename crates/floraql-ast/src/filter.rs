//! Filter syntax tree and the normalized filter expression

use crate::{AttributePath, Literal, Operator};
use floraql_diagnostics::{Span, Spanned};
use serde::Serialize;
use std::fmt;
use std::ops::Deref;

/// Right-hand side of a comparison
///
/// Serializes as a scalar, or as an array for sets and ranges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// `id=1`
    Single(Literal),
    /// `id=1,2,3`
    Set(Vec<Literal>),
    /// `price=10..20`
    Range(Literal, Literal),
}

impl Value {
    pub const fn is_range(&self) -> bool {
        matches!(self, Self::Range(..))
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Single(lit) => Some(lit),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(lit) => write!(f, "{}", lit),
            Self::Set(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            Self::Range(from, to) => write!(f, "{}..{}", from, to),
        }
    }
}

/// A comparison as written, before operator mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawComparison {
    pub attribute: AttributePath,
    /// Source operator token (`=`, `!=`, `~`, ...)
    pub operator: Spanned<String>,
    pub value: Value,
    pub span: Span,
}

/// Filter syntax tree with bracket short-hands already expanded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterNode {
    Or(Vec<FilterNode>),
    And(Vec<FilterNode>),
    Comparison(RawComparison),
}

impl FilterNode {
    /// Visit every comparison leaf left to right
    pub fn for_each_comparison<'a>(&'a self, f: &mut impl FnMut(&'a RawComparison)) {
        match self {
            Self::Or(children) | Self::And(children) => {
                for child in children {
                    child.for_each_comparison(f);
                }
            }
            Self::Comparison(cmp) => f(cmp),
        }
    }

    pub fn comparison_count(&self) -> usize {
        let mut count = 0;
        self.for_each_comparison(&mut |_| count += 1);
        count
    }
}

/// One normalized predicate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comparison {
    pub attribute: AttributePath,
    pub operator: Operator,
    pub value: Value,
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.attribute.join("."), self.operator, self.value)
    }
}

/// A list of comparisons that must all hold
pub type Conjunction = Vec<Comparison>;

/// A filter in disjunctive normal form: OR of AND-lists
///
/// Serializes as `[[comparison, ...], ...]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FilterExpression(pub Vec<Conjunction>);

impl FilterExpression {
    pub fn new(disjuncts: Vec<Conjunction>) -> Self {
        Self(disjuncts)
    }

    pub fn into_inner(self) -> Vec<Conjunction> {
        self.0
    }

    /// Every comparison across all disjuncts, in source order
    pub fn comparisons(&self) -> impl Iterator<Item = &Comparison> {
        self.0.iter().flatten()
    }
}

impl Deref for FilterExpression {
    type Target = [Conjunction];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for FilterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, conjunction) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" OR ")?;
            }
            for (j, cmp) in conjunction.iter().enumerate() {
                if j > 0 {
                    f.write_str(" AND ")?;
                }
                write!(f, "{}", cmp)?;
            }
        }
        Ok(())
    }
}
