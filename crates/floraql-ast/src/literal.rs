//! Scalar literal values

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A scalar value written on the right-hand side of a comparison
///
/// Serializes to the matching plain JSON value: `null`, a boolean, a
/// number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    /// `null` (lowercase only)
    Null,
    /// `true` / `false`
    Boolean(bool),
    /// Number without a decimal point that fits `i64`
    Integer(i64),
    /// Number with a decimal point, or an integer too large for `i64`
    Float(#[serde(with = "rust_decimal::serde::float")] Decimal),
    /// Double-quoted string with escapes resolved
    String(String),
}

impl Literal {
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Name of the literal kind, for messages
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
        }
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<i64> for Literal {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<Decimal> for Literal {
    fn from(d: Decimal) -> Self {
        Self::Float(d)
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Integer(n) => write!(f, "{}", n),
            Self::Float(d) => write!(f, "{}", d),
            Self::String(s) => {
                write!(f, "\"")?;
                for ch in s.chars() {
                    match ch {
                        '"' => write!(f, "\\\"")?,
                        '\\' => write!(f, "\\\\")?,
                        c => write!(f, "{}", c)?,
                    }
                }
                write!(f, "\"")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn test_literal_serializes_as_plain_json() {
        let values = vec![
            Literal::Null,
            Literal::Boolean(false),
            Literal::Integer(42),
            Literal::Float(Decimal::from_str("3.1415").unwrap()),
            Literal::from("baz"),
        ];
        assert_eq!(
            serde_json::to_value(&values).unwrap(),
            json!([null, false, 42, 3.1415, "baz"])
        );
    }

    #[test]
    fn test_display_escapes_strings() {
        assert_eq!(Literal::from("bar\"baz").to_string(), r#""bar\"baz""#);
        assert_eq!(Literal::Integer(-3).to_string(), "-3");
        assert_eq!(Literal::Null.to_string(), "null");
    }
}
