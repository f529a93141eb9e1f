//! Error messages, codes and locations

use floraql_diagnostics::{FQL0001, FQL0002, FQL0006, FQL0007, FQL0100, FQL0101, FQL0102, FQL0104, SourceLocation};
use floraql_parser::{parse_filter, parse_select};
use insta::assert_snapshot;
use pretty_assertions::assert_eq;

#[test]
fn test_invalid_literal() {
    let err = parse_filter("foo=Null").unwrap_err();
    assert_eq!(err.code(), FQL0001);
    assert_snapshot!(err.to_diagnostic().to_string(), @"FQL0001: unexpected `N`, expected value at 1:5");
}

#[test]
fn test_unbalanced_parenthesis() {
    let err = parse_filter("(a=1").unwrap_err();
    assert_eq!(err.code(), FQL0002);
    assert_snapshot!(err.to_string(), @"unexpected end of input, expected `)`");
}

#[test]
fn test_missing_operator() {
    let err = parse_filter("a").unwrap_err();
    assert_snapshot!(err.to_string(), @"missing comparison operator after `a`");
}

#[test]
fn test_range_operator() {
    let err = parse_filter("a>1..5").unwrap_err();
    assert_eq!(err.code(), FQL0101);
    assert_snapshot!(err.to_diagnostic().to_string(), @"FQL0101: range values cannot be used with `>` at 1:2");
}

#[test]
fn test_number_out_of_range() {
    let err = parse_filter("id=99999999999999999999999999999").unwrap_err();
    assert_eq!(err.code(), FQL0007);
    assert_snapshot!(
        err.to_diagnostic().to_string(),
        @"FQL0007: number `99999999999999999999999999999` is out of range at 1:4"
    );
}

#[test]
fn test_nesting_too_deep() {
    let source = format!("{}a=1", "(".repeat(100));
    let err = parse_filter(&source).unwrap_err();
    assert_eq!(err.code(), FQL0006);
    assert_snapshot!(
        err.to_diagnostic().to_string(),
        @"FQL0006: expression is nested more than 64 levels deep at 1:65"
    );
}

#[test]
fn test_duplicate_dot() {
    let err = parse_select("a..b").unwrap_err();
    assert_snapshot!(err.to_diagnostic().to_string(), @"FQL0001: unexpected `.`, expected attribute name at 1:3");
}

#[test]
fn test_conflicting_merge() {
    let err = parse_select("a(b=c),a(e=f)").unwrap_err();
    assert_eq!(err.code(), FQL0100);
    assert_snapshot!(err.to_diagnostic().to_string(), @"FQL0100: cannot merge conflicting option `e` of `a` at 1:8");
}

#[test]
fn test_empty_child_group() {
    let err = parse_select("a[]").unwrap_err();
    assert_eq!(err.code(), FQL0102);
    assert_snapshot!(err.to_string(), @"child group cannot be empty");
}

#[test]
fn test_reserved_parameter() {
    let err = parse_select("a(select=b)").unwrap_err();
    assert_eq!(err.code(), FQL0104);
    assert_snapshot!(err.to_string(), @"`select` cannot be used as a parameter");
}

#[test]
fn test_filter_parameter_error_points_into_select() {
    let source = "foo(filter=id=x)";
    let err = parse_select(source).unwrap_err();
    assert!(err.is_syntax());
    assert_eq!(err.location(), Some(&SourceLocation::new(1, 15, 14, 1)));
    assert_snapshot!(err.to_string(), @"unexpected `x`, expected value");

    let diagnostic = err.to_diagnostic();
    assert_eq!(diagnostic.help.as_deref(), Some("in parameter `filter`"));
}

#[test]
fn test_limit_parameter_error_points_at_value() {
    let err = parse_select("title,foo(limit=foo)").unwrap_err();
    assert!(err.is_semantic());
    assert_eq!(err.location().map(|l| l.offset), Some(16));
    assert_snapshot!(err.to_string(), @r#"limit must be an integer or "unlimited""#);
}

#[test]
fn test_multiline_location() {
    let err = parse_filter("a=1 AND\nb=Null").unwrap_err();
    let location = err.location().unwrap();
    assert_eq!((location.line, location.column), (2, 3));
}
