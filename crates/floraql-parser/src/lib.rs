//! floraql grammars built on winnow
//!
//! Entry points:
//! - [`parse_filter`] / [`parse_filter_with`]: filter expression to DNF
//! - [`parse_select`] / [`parse_select_with`]: select expression to a merged tree
//! - [`parse_order`], [`parse_limit`], [`parse_page`]: parameter values
//!
//! Each stage is also exposed on its own ([`parse_filter_tree`] +
//! [`normalize`], [`parse_select_raw`] + [`merge_select`]).
//!
//! ```
//! use floraql_parser::{parse_filter, parse_select};
//!
//! let filter = parse_filter("type.id=1,2 AND price=10..20").unwrap();
//! assert_eq!(filter.len(), 1);
//!
//! let select = parse_select("title,instruments(limit=3).quotations").unwrap();
//! assert!(select.contains_key("instruments"));
//! ```

mod combinators;
mod config;
mod filter;
mod merge;
mod normalize;
mod order;
mod scalar;
mod select;

pub use config::{DEFAULT_MAX_DEPTH, FilterConfig, OPERATOR_CHARS, SelectOptions};
pub use filter::parse_filter_tree;
pub use merge::merge_select;
pub use normalize::normalize;
pub use order::parse_order;
pub use scalar::{MAX_SAFE_INTEGER, limit_from_integer, page_from_integer, parse_limit, parse_page};
pub use select::parse_select_raw;

use floraql_ast::{FilterExpression, SelectTree};
use floraql_diagnostics::Result;
use std::sync::LazyLock;

static DEFAULT_OPTIONS: LazyLock<SelectOptions> = LazyLock::new(SelectOptions::default);

/// Parse a filter expression with the default operator table
pub fn parse_filter(source: &str) -> Result<FilterExpression> {
    parse_filter_with(source, &DEFAULT_OPTIONS.filter)
}

/// Parse a filter expression into disjunctive normal form
pub fn parse_filter_with(source: &str, config: &FilterConfig) -> Result<FilterExpression> {
    log::debug!("parsing filter {source:?}");
    let tree = parse_filter_tree(source, config)?;
    let expression = normalize(tree, config, source)?;
    log::debug!("filter parsed into {} disjuncts", expression.len());
    Ok(expression)
}

/// Parse a select expression with default options
pub fn parse_select(source: &str) -> Result<SelectTree> {
    parse_select_with(source, &DEFAULT_OPTIONS)
}

/// Parse and merge a select expression
pub fn parse_select_with(source: &str, options: &SelectOptions) -> Result<SelectTree> {
    log::debug!("parsing select {source:?}");
    let raw = parse_select_raw(source, options)?;
    let tree = merge_select(&raw, source, options)?;
    log::debug!("select parsed into {} nodes", tree.node_count());
    Ok(tree)
}
