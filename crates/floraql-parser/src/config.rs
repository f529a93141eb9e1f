//! Parser configuration

use floraql_ast::Operator;
use floraql_diagnostics::{FQL0105, QueryError, Result};
use indexmap::IndexMap;
use serde::Deserialize;

/// Deepest `(`/`[` nesting accepted by either grammar unless configured
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Characters an operator token may be made of
pub const OPERATOR_CHARS: &str = "=!<>~*^$%@&|";

pub fn is_operator_char(c: char) -> bool {
    OPERATOR_CHARS.contains(c)
}

/// Operator table used by the filter grammar and normalizer
///
/// Maps source tokens onto [`Operator`]s. The default table knows `=`, `!=`,
/// `<`, `<=`, `>` and `>=`; further tokens can be registered with
/// [`FilterConfig::with_operator`]:
///
/// ```
/// use floraql_ast::Operator;
/// use floraql_parser::FilterConfig;
///
/// let config = FilterConfig::default().with_operator("~", Operator::Like).unwrap();
/// assert_eq!(config.operator("~"), Some(Operator::Like));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "FilterConfigFile")]
pub struct FilterConfig {
    operators: IndexMap<String, Operator>,
    max_depth: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        let operators = [
            ("=", Operator::Equal),
            ("!=", Operator::NotEqual),
            ("<", Operator::Less),
            ("<=", Operator::LessOrEqual),
            (">", Operator::Greater),
            (">=", Operator::GreaterOrEqual),
        ]
        .into_iter()
        .map(|(token, op)| (token.to_string(), op))
        .collect();
        Self {
            operators,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl FilterConfig {
    /// Register an additional operator token
    pub fn with_operator(mut self, token: impl Into<String>, operator: Operator) -> Result<Self> {
        let token = token.into();
        if token.is_empty() || !token.chars().all(is_operator_char) {
            return Err(QueryError::validation(
                FQL0105,
                format!("operator token `{token}` may only contain the characters {OPERATOR_CHARS}"),
            ));
        }
        if operator.is_range_only() {
            return Err(QueryError::validation(
                FQL0105,
                format!("`{operator}` cannot be bound to a token, it is derived from range values"),
            ));
        }
        if let Some(existing) = self.operators.get(&token) {
            return Err(QueryError::validation(
                FQL0105,
                format!("operator token `{token}` is already bound to `{existing}`"),
            ));
        }
        self.operators.insert(token, operator);
        Ok(self)
    }

    /// Limit the bracket nesting of a filter
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Semantic operator bound to a source token
    pub fn operator(&self, token: &str) -> Option<Operator> {
        self.operators.get(token).copied()
    }

    pub fn has_token(&self, token: &str) -> bool {
        self.operators.contains_key(token)
    }

    pub fn tokens(&self) -> impl Iterator<Item = (&str, Operator)> {
        self.operators.iter().map(|(token, op)| (token.as_str(), *op))
    }
}

/// On-disk shape of [`FilterConfig`]: extra operators on top of the defaults
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct FilterConfigFile {
    #[serde(default)]
    operators: IndexMap<String, Operator>,
    max_depth: Option<usize>,
}

impl TryFrom<FilterConfigFile> for FilterConfig {
    type Error = QueryError;

    fn try_from(file: FilterConfigFile) -> Result<Self> {
        let config = file
            .operators
            .into_iter()
            .try_fold(Self::default(), |config, (token, op)| config.with_operator(token, op))?;
        Ok(match file.max_depth {
            Some(max_depth) => config.with_max_depth(max_depth),
            None => config,
        })
    }
}

/// Options for select parsing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct SelectOptions {
    /// Allow `{` and `}` in top-level attribute names
    pub enable_braces: bool,
    /// Operator table for `filter` parameters
    pub filter: FilterConfig,
    /// Deepest group nesting, and longest attribute path, of a select
    pub max_depth: usize,
}

impl Default for SelectOptions {
    fn default() -> Self {
        Self {
            enable_braces: false,
            filter: FilterConfig::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl SelectOptions {
    pub fn with_braces(mut self, enable: bool) -> Self {
        self.enable_braces = enable;
        self
    }

    pub fn with_filter(mut self, filter: FilterConfig) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
