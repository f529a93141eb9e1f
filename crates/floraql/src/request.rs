//! Request dispatcher and JSON value validators

use floraql_ast::{FilterExpression, Limit, OrderSpec, SelectTree};
use floraql_diagnostics::{FQL0200, FQL0201, FQL0204, QueryError, Result};
use floraql_parser::{
    MAX_SAFE_INTEGER, SelectOptions, limit_from_integer, page_from_integer, parse_filter_with, parse_order,
    parse_select_with,
};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::sync::LazyLock;

static DEFAULT_OPTIONS: LazyLock<SelectOptions> = LazyLock::new(SelectOptions::default);

/// A request with every known property parsed
///
/// Unknown properties are kept verbatim in `extra`, in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select: Option<SelectTree>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterExpression>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<Vec<OrderSpec>>,
    /// `Some(Limit::Unlimited)` serializes as `null`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<Limit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// Parse a request object with default options
pub fn parse_request(input: &Value) -> Result<ParsedRequest> {
    parse_request_with(input, &DEFAULT_OPTIONS)
}

/// Parse every known property of a request object
///
/// A failing property is reported as `Cannot parse <key>: <message>` with the
/// inner error as its source.
pub fn parse_request_with(input: &Value, options: &SelectOptions) -> Result<ParsedRequest> {
    let Value::Object(properties) = input else {
        return Err(QueryError::validation(FQL0200, "Cannot parse request: must be an object"));
    };

    let mut request = ParsedRequest::default();
    for (key, value) in properties {
        dispatch(&mut request, key, value, options).map_err(|err| QueryError::request(key.as_str(), err))?;
    }
    Ok(request)
}

fn dispatch(request: &mut ParsedRequest, key: &str, value: &Value, options: &SelectOptions) -> Result<()> {
    match key {
        "id" => request.id = Some(parse_id(value)?),
        "select" => request.select = Some(parse_select_with(string(key, value)?, options)?),
        "filter" => request.filter = Some(parse_filter_with(string(key, value)?, &options.filter)?),
        "order" => request.order = Some(parse_order(string(key, value)?)?),
        "limit" => request.limit = Some(parse_limit(value)?),
        "page" => request.page = Some(parse_page(Some(value))?),
        "search" => request.search = parse_search(Some(value))?,
        "aggregate" => parse_aggregate(value)?,
        _ => {
            log::debug!("passing request property `{key}` through unparsed");
            request.extra.insert(key.to_string(), value.clone());
        }
    }
    Ok(())
}

fn string<'v>(key: &str, value: &'v Value) -> Result<&'v str> {
    value
        .as_str()
        .ok_or_else(|| QueryError::validation(FQL0201, format!("{key} must be a string")))
}

/// An integral JSON number, or `None` for anything else
fn integer(value: &Value) -> Option<i64> {
    let Value::Number(number) = value else {
        return None;
    };
    number.as_i64().or_else(|| {
        let float = number.as_f64()?;
        (float.fract() == 0.0 && float.abs() <= MAX_SAFE_INTEGER as f64).then_some(float as i64)
    })
}

/// A string or number, returned as string
pub fn parse_id(value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(QueryError::validation(FQL0201, "id only allows string or number")),
    }
}

/// `"unlimited"`, or a positive integer given as number or digit string
pub fn parse_limit(value: &Value) -> Result<Limit> {
    match value {
        Value::String(s) => floraql_parser::parse_limit(s),
        other => limit_from_integer(integer(other)),
    }
}

/// Page number; absent means the first page
pub fn parse_page(value: Option<&Value>) -> Result<u64> {
    match value {
        None => Ok(1),
        Some(Value::String(s)) => floraql_parser::parse_page(s),
        Some(other) => page_from_integer(integer(other)),
    }
}

pub fn parse_search(value: Option<&Value>) -> Result<Option<String>> {
    match value {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(_) => Err(QueryError::validation(FQL0201, "search only allows string or number")),
    }
}

/// Aggregations are not supported; every input is rejected
pub fn parse_aggregate(_value: &Value) -> Result<()> {
    Err(QueryError::validation(FQL0204, "aggregate is not implemented"))
}
