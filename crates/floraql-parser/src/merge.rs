//! Fan-out expansion and merging of select trees

use crate::scalar::{parse_limit, parse_page};
use crate::{SelectOptions, parse_filter_with, parse_order};
use floraql_ast::{ParameterValue, Parameters, RawParameter, RawSelect, SelectNode, SelectStep, SelectTree};
use floraql_diagnostics::{FQL0006, FQL0100, FQL0102, FQL0104, QueryError, Result, Span, Spanned};

/// Expand fan-out groups of a raw select tree and merge all occurrences of
/// an attribute into one node.
///
/// `source` is the text `raw` was parsed from; errors point into it.
pub fn merge_select(raw: &RawSelect, source: &str, options: &SelectOptions) -> Result<SelectTree> {
    let merger = Merger { source, options };
    let mut tree = SelectTree::new();
    for item in &raw.items {
        for chain in merger.chains(&item.steps)? {
            merger.insert(&chain, &mut tree)?;
        }
    }
    Ok(tree)
}

/// One attribute of an expanded path with every parameter that applies to it
#[derive(Debug, Clone)]
struct Link<'r> {
    name: &'r Spanned<String>,
    parameters: Vec<&'r RawParameter>,
}

type Chain<'r> = Vec<Link<'r>>;

struct Merger<'s> {
    source: &'s str,
    options: &'s SelectOptions,
}

impl Merger<'_> {
    /// Every plain attribute path described by `steps`, in source order
    fn chains<'r>(&self, steps: &'r [SelectStep]) -> Result<Vec<Chain<'r>>> {
        let mut chains: Vec<Chain<'r>> = vec![Vec::new()];
        for step in steps {
            let heads = self.heads(step)?;
            let mut extended = Vec::with_capacity(chains.len() * heads.len());
            for chain in &chains {
                for head in &heads {
                    let mut chain = chain.clone();
                    chain.extend(head.iter().cloned());
                    if let Some(link) = chain.get(self.options.max_depth) {
                        return Err(self.too_deep(link.name.span));
                    }
                    extended.push(chain);
                }
            }
            chains = extended;
        }
        Ok(chains)
    }

    /// Chains contributed by a single step. Group parameters are handed to
    /// the last attribute of each member.
    fn heads<'r>(&self, step: &'r SelectStep) -> Result<Vec<Chain<'r>>> {
        match step {
            SelectStep::Attribute { name, parameters } => Ok(vec![vec![Link {
                name,
                parameters: parameters.iter().collect(),
            }]]),
            SelectStep::Group {
                items,
                parameters,
                span,
            } => {
                if items.is_empty() {
                    return Err(self.empty_group(*span));
                }
                let mut heads = Vec::new();
                for item in items {
                    for mut chain in self.chains(&item.steps)? {
                        if let Some(leaf) = chain.last_mut() {
                            leaf.parameters.extend(parameters.iter());
                        }
                        heads.push(chain);
                    }
                }
                Ok(heads)
            }
        }
    }

    fn insert(&self, chain: &[Link<'_>], tree: &mut SelectTree) -> Result<()> {
        let Some((leaf, parents)) = chain.split_last() else {
            return Ok(());
        };
        log::trace!(
            "merging select path {}",
            chain.iter().map(|l| l.name.inner.as_str()).collect::<Vec<_>>().join(".")
        );

        let mut path = Vec::with_capacity(chain.len());
        let mut level = tree;
        for link in parents {
            path.push(link.name.inner.clone());
            let node = self.node(link, &path)?;
            level = level
                .insert_merged(node)
                .map_err(|conflict| self.conflict(&path, &conflict.parameter, link.name.span))?
                .children_mut();
        }

        path.push(leaf.name.inner.clone());
        let node = self.node(leaf, &path)?;
        level
            .insert_merged(node)
            .map_err(|conflict| self.conflict(&path, &conflict.parameter, leaf.name.span))?;
        Ok(())
    }

    fn node(&self, link: &Link<'_>, path: &[String]) -> Result<SelectNode> {
        let mut parameters = Parameters::new();
        for raw in &link.parameters {
            let value = self.parameter_value(raw)?;
            if let Some(existing) = parameters.get(&raw.name.inner) {
                if *existing != value {
                    return Err(self.conflict(path, &raw.name.inner, raw.name.span));
                }
                continue;
            }
            parameters.insert(raw.name.inner.clone(), value);
        }
        Ok(SelectNode {
            name: link.name.inner.clone(),
            parameters,
            children: None,
        })
    }

    fn parameter_value(&self, raw: &RawParameter) -> Result<ParameterValue> {
        let text = raw.value.inner.as_str();
        let parsed = match raw.name.inner.as_str() {
            "filter" => parse_filter_with(text, &self.options.filter).map(ParameterValue::Filter),
            "order" => parse_order(text).map(ParameterValue::Order),
            "limit" => parse_limit(text).map(ParameterValue::Limit),
            "page" => parse_page(text).map(ParameterValue::Page),
            "id" => Ok(ParameterValue::Id(text.to_string())),
            "search" => Ok(ParameterValue::Search(text.to_string())),
            reserved @ ("select" | "aggregate") => {
                return Err(QueryError::semantic_at(
                    FQL0104,
                    format!("`{reserved}` cannot be used as a parameter"),
                    self.source,
                    raw.name.span,
                ));
            }
            _ => Ok(ParameterValue::Raw(text.to_string())),
        };
        parsed.map_err(|err| self.relocate(err, raw))
    }

    /// Point an error raised on a parameter value into the select expression
    fn relocate(&self, err: QueryError, raw: &RawParameter) -> QueryError {
        let context = format!("in parameter `{}`", raw.name.inner);
        match err {
            QueryError::Validation { code, message } => {
                QueryError::semantic_at(code, message, self.source, raw.value.span).with_context(context)
            }
            other => other.reanchor(raw.value.span.start, self.source).with_context(context),
        }
    }

    fn conflict(&self, path: &[String], parameter: &str, span: Span) -> QueryError {
        QueryError::semantic_at(
            FQL0100,
            format!("cannot merge conflicting option `{parameter}` of `{}`", path.join(".")),
            self.source,
            span,
        )
    }

    fn too_deep(&self, span: Span) -> QueryError {
        QueryError::syntax_at(
            FQL0006,
            format!("select path is nested more than {} levels deep", self.options.max_depth),
            self.source,
            span,
        )
    }

    fn empty_group(&self, span: Span) -> QueryError {
        QueryError::semantic_at(FQL0102, "child group cannot be empty", self.source, span)
    }
}
