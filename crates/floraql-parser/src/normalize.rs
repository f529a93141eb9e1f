//! Filter normalization into disjunctive normal form

use crate::FilterConfig;
use floraql_ast::{Comparison, Conjunction, FilterExpression, FilterNode, RawComparison};
use floraql_diagnostics::{FQL0101, FQL0103, QueryError, Result};

/// Map operator tokens onto semantic operators and flatten the tree into an
/// OR of AND-lists.
///
/// `source` is the text the tree was parsed from; errors point into it.
/// Conjunctions are produced in source order: the conjunctions of an `AND`
/// are the left-to-right cross product of its children's conjunctions.
pub fn normalize(tree: FilterNode, config: &FilterConfig, source: &str) -> Result<FilterExpression> {
    let mut failure = None;
    tree.for_each_comparison(&mut |cmp| {
        if failure.is_none() {
            failure = resolve(cmp, config, source).err();
        }
    });
    if let Some(err) = failure {
        return Err(err);
    }

    let disjuncts = dnf(tree, config, source)?;
    log::trace!("normalized filter into {} conjunctions", disjuncts.len());
    Ok(FilterExpression::new(disjuncts))
}

fn resolve(cmp: &RawComparison, config: &FilterConfig, source: &str) -> Result<Comparison> {
    let token = &cmp.operator;
    let operator = config.operator(&token.inner).ok_or_else(|| {
        QueryError::semantic_at(
            FQL0103,
            format!("unknown operator `{}`", token.inner),
            source,
            token.span,
        )
    })?;

    // Only the `=` and `!=` tokens accept ranges
    let operator = if cmp.value.is_range() {
        matches!(token.inner.as_str(), "=" | "!=")
            .then(|| operator.for_range())
            .flatten()
            .ok_or_else(|| {
                QueryError::semantic_at(
                    FQL0101,
                    format!("range values cannot be used with `{}`", token.inner),
                    source,
                    token.span,
                )
            })?
    } else {
        operator
    };

    Ok(Comparison {
        attribute: cmp.attribute.clone(),
        operator,
        value: cmp.value.clone(),
    })
}

fn dnf(node: FilterNode, config: &FilterConfig, source: &str) -> Result<Vec<Conjunction>> {
    match node {
        FilterNode::Comparison(cmp) => Ok(vec![vec![resolve(&cmp, config, source)?]]),
        FilterNode::Or(children) => {
            let mut disjuncts = Vec::new();
            for child in children {
                disjuncts.extend(dnf(child, config, source)?);
            }
            Ok(disjuncts)
        }
        FilterNode::And(children) => {
            let mut product: Vec<Conjunction> = vec![Vec::new()];
            for child in children {
                let right = dnf(child, config, source)?;
                let mut next = Vec::with_capacity(product.len() * right.len());
                for left in &product {
                    for conjunction in &right {
                        let mut combined = left.clone();
                        combined.extend(conjunction.iter().cloned());
                        next.push(combined);
                    }
                }
                product = next;
            }
            Ok(product)
        }
    }
}
