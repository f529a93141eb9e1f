//! Semantic comparison operators

use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison operators as they appear in a normalized filter
///
/// The source tokens (`=`, `!=`, `<`, ...) are mapped onto these names by
/// the operator table of the filter configuration. `Between` and
/// `NotBetween` are never written directly; they are what `=` and `!=`
/// become when the value is a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operator {
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    Between,
    NotBetween,
    Like,
}

impl Operator {
    /// The wire name (`equal`, `notBetween`, ...)
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::NotEqual => "notEqual",
            Self::Less => "less",
            Self::LessOrEqual => "lessOrEqual",
            Self::Greater => "greater",
            Self::GreaterOrEqual => "greaterOrEqual",
            Self::Between => "between",
            Self::NotBetween => "notBetween",
            Self::Like => "like",
        }
    }

    /// Operators produced by range reclassification only
    pub const fn is_range_only(&self) -> bool {
        matches!(self, Self::Between | Self::NotBetween)
    }

    /// The operator a range value turns this operator into, if any
    pub const fn for_range(&self) -> Option<Operator> {
        match self {
            Self::Equal => Some(Self::Between),
            Self::NotEqual => Some(Self::NotBetween),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_reclassification() {
        assert_eq!(Operator::Equal.for_range(), Some(Operator::Between));
        assert_eq!(Operator::NotEqual.for_range(), Some(Operator::NotBetween));
        assert_eq!(Operator::Greater.for_range(), None);
        assert_eq!(Operator::Like.for_range(), None);
    }

    #[test]
    fn test_serde_names_match_display() {
        for op in [Operator::GreaterOrEqual, Operator::NotBetween, Operator::Like] {
            let json = serde_json::to_string(&op).unwrap();
            assert_eq!(json, format!("\"{}\"", op.name()));
        }
        let parsed: Operator = serde_json::from_str("\"lessOrEqual\"").unwrap();
        assert_eq!(parsed, Operator::LessOrEqual);
    }
}
