//! Tests for filter expressions
//!
//! Covers:
//! - Comparisons, operators and literal values
//! - AND/OR precedence and parentheses
//! - Range and set values
//! - Bracket short-hands
//! - Operator configuration
//! - Number limits and nesting depth
//! - Rejected input

use floraql_ast::{FilterExpression, Operator};
use floraql_diagnostics::{FQL0006, FQL0007, FQL0101};
use floraql_parser::{DEFAULT_MAX_DEPTH, FilterConfig, parse_filter, parse_filter_with};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};

fn filter(input: &str) -> FilterExpression {
    parse_filter(input).unwrap_or_else(|e| panic!("Failed to parse '{}': {}", input, e))
}

fn filter_json(input: &str) -> Value {
    serde_json::to_value(filter(input)).unwrap()
}

fn cmp(attribute: &[&str], operator: &str, value: Value) -> Value {
    json!({ "attribute": attribute, "operator": operator, "value": value })
}

// === Comparisons ===

#[test]
fn test_single_comparison() {
    assert_eq!(filter_json("id=1"), json!([[cmp(&["id"], "equal", json!(1))]]));
}

#[test]
fn test_nested_attribute() {
    assert_eq!(
        filter_json("type.id=1"),
        json!([[cmp(&["type", "id"], "equal", json!(1))]])
    );
}

#[rstest]
#[case("a=1", "equal")]
#[case("a!=1", "notEqual")]
#[case("a<1", "less")]
#[case("a<=1", "lessOrEqual")]
#[case("a>1", "greater")]
#[case("a>=1", "greaterOrEqual")]
fn test_operators(#[case] input: &str, #[case] operator: &str) {
    assert_eq!(filter_json(input), json!([[cmp(&["a"], operator, json!(1))]]));
}

#[rstest]
#[case("a=1", json!(1))]
#[case("a=-7", json!(-7))]
#[case("a=3.5", json!(3.5))]
#[case("a=true", json!(true))]
#[case("a=false", json!(false))]
#[case("a=null", json!(null))]
#[case(r#"a="foo""#, json!("foo"))]
#[case(r#"a="with \"quotes\"""#, json!("with \"quotes\""))]
#[case(r#"a="AND OR ( ) [ ]""#, json!("AND OR ( ) [ ]"))]
fn test_values(#[case] input: &str, #[case] value: Value) {
    assert_eq!(filter_json(input), json!([[cmp(&["a"], "equal", value)]]));
}

// === Precedence ===

#[test]
fn test_and_binds_tighter_than_or() {
    let expr = filter("a=1 AND b=2 OR c=3");
    assert_eq!(expr.len(), 2);
    assert_eq!(expr[0].len(), 2);
    assert_eq!(expr[1].len(), 1);
}

#[test]
fn test_parentheses_distribute() {
    assert_eq!(
        filter_json("(a=1 OR b=2) AND c=3"),
        json!([
            [cmp(&["a"], "equal", json!(1)), cmp(&["c"], "equal", json!(3))],
            [cmp(&["b"], "equal", json!(2)), cmp(&["c"], "equal", json!(3))]
        ])
    );
}

#[test]
fn test_pairwise_conjunctions_in_source_order() {
    let expr = filter("(a=1 OR b=2) AND (c=3 OR d=4)");
    let rendered: Vec<String> = expr
        .iter()
        .map(|conjunction| {
            conjunction
                .iter()
                .map(|c| c.attribute.join("."))
                .collect::<Vec<_>>()
                .join("+")
        })
        .collect();
    assert_eq!(rendered, vec!["a+c", "a+d", "b+c", "b+d"]);
}

#[test]
fn test_output_is_dnf() {
    let expr = filter("a=1 AND (b=2 OR (c=3 AND (d=4 OR e=5)))");
    assert_eq!(expr.len(), 3);
    for conjunction in expr.iter() {
        assert_eq!(conjunction[0].attribute.join("."), "a");
    }
}

// === Ranges and sets ===

#[test]
fn test_range_becomes_between() {
    assert_eq!(
        filter_json("foo=10..20"),
        json!([[cmp(&["foo"], "between", json!([10, 20]))]])
    );
    assert_eq!(
        filter_json("foo!=10..20"),
        json!([[cmp(&["foo"], "notBetween", json!([10, 20]))]])
    );
}

#[test]
fn test_set_value() {
    assert_eq!(
        filter_json(r#"id=1,2,"three""#),
        json!([[cmp(&["id"], "equal", json!([1, 2, "three"]))]])
    );
}

#[rstest]
#[case("foo>10..20")]
#[case("foo<=10..20")]
fn test_range_with_ordering_operator_fails(#[case] input: &str) {
    let err = parse_filter(input).unwrap_err();
    assert!(err.is_semantic(), "{input}: {err:?}");
}

#[rstest]
#[case("a=1..2,3")]
#[case("a=1,2..3")]
#[case("a=1..2..3")]
#[case("a=1..")]
#[case("a=1,")]
fn test_malformed_range_or_set(#[case] input: &str) {
    assert!(parse_filter(input).unwrap_err().is_syntax(), "{input}");
}

// === Bracket short-hands ===

#[rstest]
#[case(
    "instrument[stock OR currency].active=true",
    "instrument.stock.active=true OR instrument.currency.active=true"
)]
#[case("group[a AND b]=1", "group.a=1 AND group.b=1")]
#[case("a[b OR c]=1 AND d=2", "(a.b=1 OR a.c=1) AND d=2")]
#[case("a[b[c OR d] AND e]=1", "(a.b.c=1 OR a.b.d=1) AND a.e=1")]
#[case(
    "author.group[isPremium=true AND package.price>=10]",
    "author.group.isPremium=true AND author.group.package.price>=10"
)]
#[case("a[(b=1 OR c=2) AND d=3]", "(a.b=1 OR a.c=2) AND a.d=3")]
fn test_short_hand_equivalence(#[case] short: &str, #[case] long: &str) {
    assert_eq!(filter(short), filter(long));
}

#[test]
fn test_short_hand_inside_conjunction() {
    assert_eq!(
        filter_json("x=0 AND a[b OR c]=1"),
        json!([
            [cmp(&["x"], "equal", json!(0)), cmp(&["a", "b"], "equal", json!(1))],
            [cmp(&["x"], "equal", json!(0)), cmp(&["a", "c"], "equal", json!(1))]
        ])
    );
}

// === Configuration ===

#[test]
fn test_configured_operator() {
    let config = FilterConfig::default().with_operator("~", Operator::Like).unwrap();
    let expr = parse_filter_with(r#"name~"foo%""#, &config).unwrap();
    assert_eq!(expr[0][0].operator, Operator::Like);

    assert!(parse_filter(r#"name~"foo%""#).is_err());
}

#[rstest]
#[case("a==1..2")]
#[case("a==1..2 OR b=1")]
fn test_range_rejected_on_aliased_equality(#[case] input: &str) {
    let config = FilterConfig::default().with_operator("==", Operator::Equal).unwrap();
    assert_eq!(parse_filter_with("a==1", &config).unwrap()[0][0].operator, Operator::Equal);

    let err = parse_filter_with(input, &config).unwrap_err();
    assert_eq!(err.code(), FQL0101);
    assert!(err.is_semantic());
}

// === Numbers ===

#[rstest]
#[case("id=99999999999999999999", "99999999999999999999")]
#[case("id=-99999999999999999999", "-99999999999999999999")]
#[case("id=9223372036854775807", "9223372036854775807")]
fn test_large_integers(#[case] input: &str, #[case] value: &str) {
    assert_eq!(filter(input)[0][0].value.to_string(), value);
}

#[rstest]
#[case("id=123456789012345678901234567890.5", "is out of range")]
#[case("id=1.00000000000000000000000000000000001", "without rounding")]
#[case("id=1,2,123456789012345678901234567890", "is out of range")]
fn test_unrepresentable_numbers(#[case] input: &str, #[case] reason: &str) {
    let err = parse_filter(input).unwrap_err();
    assert_eq!(err.code(), FQL0007);
    assert!(err.is_syntax());
    assert!(err.to_string().contains(reason), "{err}");
    assert!(!err.to_string().contains("expected value"), "{err}");
}

#[test]
fn test_unrepresentable_number_location() {
    let err = parse_filter("a=1 AND id=123456789012345678901234567890.5").unwrap_err();
    let location = err.location().unwrap();
    assert_eq!((location.column, location.length), (12, 32));
}

// === Nesting ===

fn nested(depth: usize) -> String {
    format!("{}a=1{}", "(".repeat(depth), ")".repeat(depth))
}

#[rstest]
#[case(nested(DEFAULT_MAX_DEPTH + 1))]
#[case(nested(1000))]
#[case("(".repeat(10_000))]
#[case(format!("a{}=1", "[b".repeat(1000)))]
#[case(format!("x=1 AND {}", "[".repeat(20_000)))]
fn test_nesting_limit(#[case] input: String) {
    let err = parse_filter(&input).unwrap_err();
    assert_eq!(err.code(), FQL0006);
    assert!(err.is_syntax());
    assert_eq!(
        err.to_string(),
        format!("expression is nested more than {DEFAULT_MAX_DEPTH} levels deep")
    );
}

#[test]
fn test_nesting_within_limit() {
    assert_eq!(filter(&nested(16)), filter("a=1"));

    let config = FilterConfig::default().with_max_depth(3);
    assert!(parse_filter_with(&nested(3), &config).is_ok());
    assert!(parse_filter_with("a[b[c[d=1]]]", &config).is_ok());

    let err = parse_filter_with(&nested(4), &config).unwrap_err();
    assert_eq!(err.code(), FQL0006);
    assert_eq!(err.location().map(|l| l.offset), Some(3));
}

#[test]
fn test_brackets_in_strings_are_not_nesting() {
    let config = FilterConfig::default().with_max_depth(1);
    let input = format!(r#"(a="{}")"#, "(".repeat(100));
    assert!(parse_filter_with(&input, &config).is_ok());
}

// === Rejected input ===

#[rstest]
#[case("")]
#[case("   ")]
#[case("foo=Null")]
#[case("foo=NULL")]
#[case("foo=undefined")]
#[case("foo=bar")]
#[case("a=1 b=2")]
#[case("a=1 and b=2")]
#[case("a=1 AND")]
#[case("(a=1")]
#[case("a=1)")]
#[case("a[b=1")]
#[case("a")]
#[case("a==1")]
#[case("a = 1")]
#[case("=1")]
#[case("a..b=1")]
#[case("a.=1")]
#[case(r#"a="open"#)]
#[case("a[]=1")]
fn test_syntax_errors(#[case] input: &str) {
    let err = parse_filter(input).unwrap_err();
    assert!(err.is_syntax(), "{input:?} gave {err:?}");
}

#[test]
fn test_null_is_case_sensitive() {
    assert_eq!(filter_json("foo=null")[0][0]["value"], Value::Null);
}
