//! Select trees: the raw syntax tree and the merged output tree

use crate::{FilterExpression, OrderSpec};
use floraql_diagnostics::{Span, Spanned};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::ops::Deref;

/// Value of a `limit` parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Limit {
    /// `unlimited`, serialized as `null`
    Unlimited,
    Count(u64),
}

impl Limit {
    pub const fn count(&self) -> Option<u64> {
        match self {
            Self::Unlimited => None,
            Self::Count(n) => Some(*n),
        }
    }
}

/// A parameter attached to a select node, parsed according to its name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Filter(FilterExpression),
    Order(Vec<OrderSpec>),
    Limit(Limit),
    Page(u64),
    Id(String),
    Search(String),
    /// Unknown parameter, kept verbatim
    Raw(String),
}

/// Parameters of one node, keyed by name
pub type Parameters = IndexMap<String, ParameterValue>;

/// One selected attribute
///
/// Serializes as its parameters plus a `select` key for the children:
/// `{"limit": 3, "select": {"b": {}}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectNode {
    #[serde(skip)]
    pub name: String,
    #[serde(flatten)]
    pub parameters: Parameters,
    #[serde(rename = "select", skip_serializing_if = "Option::is_none")]
    pub children: Option<SelectTree>,
}

/// Two occurrences of an attribute could not be merged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeConflict {
    /// Attribute path of the node whose parameters collide
    pub path: Vec<String>,
    /// A parameter given differently by the two occurrences
    pub parameter: String,
}

impl fmt::Display for MergeConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot merge conflicting option `{}` of `{}`",
            self.parameter,
            self.path.join(".")
        )
    }
}

impl SelectNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Parameters::new(),
            children: None,
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: ParameterValue) -> Self {
        self.parameters.insert(name.into(), value);
        self
    }

    pub fn with_child(mut self, child: SelectNode) -> Self {
        self.children_mut().insert(child.name.clone(), child);
        self
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterValue> {
        self.parameters.get(name)
    }

    pub fn child(&self, name: &str) -> Option<&SelectNode> {
        self.children.as_ref().and_then(|c| c.get(name))
    }

    /// Children map, created on first use
    pub fn children_mut(&mut self) -> &mut SelectTree {
        self.children.get_or_insert_with(SelectTree::default)
    }

    /// Apply the parameters of another occurrence of this attribute.
    ///
    /// An occurrence without parameters adopts the other one's. When both
    /// occurrences carry parameters they have to be identical.
    pub fn merge_parameters(&mut self, parameters: Parameters) -> Result<(), String> {
        if parameters.is_empty() {
            return Ok(());
        }
        if self.parameters.is_empty() {
            self.parameters = parameters;
            return Ok(());
        }
        if self.parameters == parameters {
            return Ok(());
        }
        let conflicting = parameters
            .iter()
            .find(|(key, value)| self.parameters.get(*key) != Some(*value))
            .or_else(|| self.parameters.iter().find(|(key, _)| !parameters.contains_key(*key)))
            .map(|(key, _)| key.clone())
            .unwrap_or_default();
        Err(conflicting)
    }

    /// Merge another occurrence of the same attribute into this node,
    /// recursing into same-named children.
    pub fn merge(&mut self, other: SelectNode) -> Result<(), MergeConflict> {
        self.merge_at(other, &mut Vec::new())
    }

    fn merge_at(&mut self, other: SelectNode, path: &mut Vec<String>) -> Result<(), MergeConflict> {
        path.push(self.name.clone());
        self.merge_parameters(other.parameters)
            .map_err(|parameter| MergeConflict {
                path: path.clone(),
                parameter,
            })?;
        if let Some(children) = other.children {
            let own = self.children_mut();
            for (name, child) in children.0 {
                match own.0.get_mut(&name) {
                    Some(existing) => existing.merge_at(child, path)?,
                    None => {
                        own.0.insert(name, child);
                    }
                }
            }
        }
        path.pop();
        Ok(())
    }

    /// Number of nodes in this subtree, this node included
    pub fn node_count(&self) -> usize {
        1 + self.children.as_ref().map_or(0, SelectTree::node_count)
    }
}

/// Selected attributes of one level, keyed by name in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SelectTree(pub IndexMap<String, SelectNode>);

impl SelectTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `node`, merging it into an existing node of the same name
    pub fn insert_merged(&mut self, node: SelectNode) -> Result<&mut SelectNode, MergeConflict> {
        let name = node.name.clone();
        let entry = self.0.entry(name);
        match entry {
            indexmap::map::Entry::Occupied(occupied) => {
                let existing = occupied.into_mut();
                existing.merge(node)?;
                Ok(existing)
            }
            indexmap::map::Entry::Vacant(vacant) => Ok(vacant.insert(node)),
        }
    }

    pub fn insert(&mut self, name: String, node: SelectNode) -> Option<SelectNode> {
        self.0.insert(name, node)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut SelectNode> {
        self.0.get_mut(name)
    }

    pub fn node_count(&self) -> usize {
        self.0.values().map(SelectNode::node_count).sum()
    }
}

impl Deref for SelectTree {
    type Target = IndexMap<String, SelectNode>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromIterator<SelectNode> for SelectTree {
    fn from_iter<I: IntoIterator<Item = SelectNode>>(iter: I) -> Self {
        Self(iter.into_iter().map(|node| (node.name.clone(), node)).collect())
    }
}

/// `name=value` inside a parameter group, value not yet interpreted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawParameter {
    pub name: Spanned<String>,
    pub value: Spanned<String>,
}

/// One step of a select item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectStep {
    /// `name(param=value)...`
    Attribute {
        name: Spanned<String>,
        parameters: Vec<RawParameter>,
    },
    /// `[item, item](param=value)...`
    Group {
        items: Vec<RawSelectItem>,
        parameters: Vec<RawParameter>,
        span: Span,
    },
}

impl SelectStep {
    pub fn parameters(&self) -> &[RawParameter] {
        match self {
            Self::Attribute { parameters, .. } | Self::Group { parameters, .. } => parameters,
        }
    }

    pub fn parameters_mut(&mut self) -> &mut Vec<RawParameter> {
        match self {
            Self::Attribute { parameters, .. } | Self::Group { parameters, .. } => parameters,
        }
    }
}

/// A chain of steps such as `a(limit=3).b[c,d]`; each step nests under the
/// previous one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSelectItem {
    pub steps: Vec<SelectStep>,
    pub span: Span,
}

/// Select syntax tree, before fan-out expansion and merging
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSelect {
    pub items: Vec<RawSelectItem>,
}
