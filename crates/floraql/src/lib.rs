//! Query parameters for JSON APIs
//!
//! floraql turns the string parameters of an API request into structured
//! values:
//! - `select`: which attributes to return, nested, with per-node options
//! - `filter`: boolean attribute comparisons in disjunctive normal form
//! - `order`, `limit`, `page`, `id`, `search`: scalar options
//!
//! # Example
//!
//! ```
//! use floraql::parse_request;
//! use serde_json::json;
//!
//! let request = parse_request(&json!({
//!     "select": "title,instruments(limit=3).quotations",
//!     "filter": "type.id=1,2",
//!     "limit": "10",
//! }))
//! .unwrap();
//!
//! assert!(request.select.is_some());
//! assert_eq!(request.filter.as_ref().map(|f| f.len()), Some(1));
//! ```

pub use floraql_ast as ast;
pub use floraql_diagnostics as diagnostics;
pub use floraql_parser as parser;

pub use floraql_ast::{Direction, FilterExpression, Limit, OrderSpec, SelectTree};
pub use floraql_diagnostics::{QueryError, Result};
pub use floraql_parser::{
    FilterConfig, SelectOptions, parse_filter, parse_filter_with, parse_order, parse_select,
    parse_select_with,
};

mod request;

pub use request::{
    ParsedRequest, parse_aggregate, parse_id, parse_limit, parse_page, parse_request,
    parse_request_with, parse_search,
};

#[cfg(feature = "cli")]
pub mod cli;
