//! `limit` and `page` values given as text

use floraql_ast::Limit;
use floraql_diagnostics::{FQL0201, FQL0202, QueryError, Result};

/// Largest integer a JSON number carries without loss (2^53 - 1)
pub const MAX_SAFE_INTEGER: i64 = 9_007_199_254_740_991;

const LIMIT_TYPE: &str = "limit must be an integer or \"unlimited\"";
const LIMIT_RANGE: &str = "limit must be greater than 0";
const PAGE_TYPE: &str = "page must be an integer";
const PAGE_RANGE: &str = "page must be greater than 0";

/// Strict decimal integer: optional `-`, then digits only
fn integer(text: &str) -> Option<i64> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn positive(value: Option<i64>, type_message: &str, range_message: &str) -> Result<u64> {
    match value {
        Some(n) if !(-MAX_SAFE_INTEGER..=MAX_SAFE_INTEGER).contains(&n) => {
            Err(QueryError::validation(FQL0201, type_message))
        }
        Some(n) if n < 1 => Err(QueryError::validation(FQL0202, range_message)),
        Some(n) => u64::try_from(n).map_err(|_| QueryError::validation(FQL0201, type_message)),
        None => Err(QueryError::validation(FQL0201, type_message)),
    }
}

/// `unlimited` or a positive integer
pub fn parse_limit(input: &str) -> Result<Limit> {
    if input == "unlimited" {
        return Ok(Limit::Unlimited);
    }
    limit_from_integer(integer(input))
}

/// Validate an already numeric limit; `None` stands for a non-integer
pub fn limit_from_integer(value: Option<i64>) -> Result<Limit> {
    positive(value, LIMIT_TYPE, LIMIT_RANGE).map(Limit::Count)
}

pub fn parse_page(input: &str) -> Result<u64> {
    page_from_integer(integer(input))
}

pub fn page_from_integer(value: Option<i64>) -> Result<u64> {
    positive(value, PAGE_TYPE, PAGE_RANGE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("1", Limit::Count(1))]
    #[case("100", Limit::Count(100))]
    #[case("9007199254740991", Limit::Count(9_007_199_254_740_991))]
    #[case("unlimited", Limit::Unlimited)]
    fn test_limit(#[case] input: &str, #[case] expected: Limit) {
        assert_eq!(parse_limit(input).unwrap(), expected);
    }

    #[rstest]
    #[case("foo", LIMIT_TYPE)]
    #[case("5;1", LIMIT_TYPE)]
    #[case("5.1", LIMIT_TYPE)]
    #[case("+5", LIMIT_TYPE)]
    #[case(" 5", LIMIT_TYPE)]
    #[case("", LIMIT_TYPE)]
    #[case("Unlimited", LIMIT_TYPE)]
    #[case("999999999999999999", LIMIT_TYPE)]
    #[case("99999999999999999999999", LIMIT_TYPE)]
    #[case("0", LIMIT_RANGE)]
    #[case("-1", LIMIT_RANGE)]
    fn test_invalid_limit(#[case] input: &str, #[case] message: &str) {
        assert_eq!(parse_limit(input).unwrap_err().to_string(), message);
    }

    #[test]
    fn test_page() {
        assert_eq!(parse_page("3").unwrap(), 3);
        assert_eq!(parse_page("0").unwrap_err().to_string(), PAGE_RANGE);
        assert_eq!(parse_page("x").unwrap_err().to_string(), PAGE_TYPE);
        assert_eq!(parse_page("unlimited").unwrap_err().to_string(), PAGE_TYPE);
    }
}
