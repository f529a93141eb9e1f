//! Select grammar
//!
//! ```text
//! list       := item ( "," item )*
//! item       := first ( "." attribute | group )*
//! first      := attribute | group
//! attribute  := name params*
//! group      := "[" list? "]" params*
//! params     := "(" name "=" value ")"
//! ```
//!
//! A group in first position fans its members out as siblings: `[b,c].d`
//! selects `b.d` and `c.d`. Names containing `{`/`}` are only accepted in
//! first position at the top level, and only when braces are enabled.

use crate::SelectOptions;
use crate::combinators::{
    Input, PResult, attribute_name, check_nesting, expected, identifier, input, parameter_value, syntax_error,
};
use floraql_ast::{RawParameter, RawSelect, RawSelectItem, SelectStep};
use floraql_diagnostics::{FQL0003, FQL0004, QueryError, Result, Span};
use std::collections::HashSet;
use winnow::combinator::{alt, cut_err, eof, opt, preceded, repeat, terminated};
use winnow::prelude::*;

/// Parse a select expression into its raw tree, without merging
pub fn parse_select_raw(source: &str, options: &SelectOptions) -> Result<RawSelect> {
    if source.is_empty() {
        return Err(QueryError::syntax_at(
            FQL0003,
            "select expression is empty",
            source,
            Span::point(0),
        ));
    }
    check_nesting(source, options.max_depth)?;

    let braces = options.enable_braces;
    let items = terminated(
        |i: &mut Input<'_>| list(i, braces),
        eof.context(expected("`,` or end of input")),
    )
    .parse(input(source))
    .map_err(|e| syntax_error(source, &e))?;

    let raw = RawSelect { items };
    check_parameters(&raw.items, source)?;
    Ok(raw)
}

/// `braces` is set while parsing top-level names
fn list(input: &mut Input<'_>, braces: bool) -> PResult<Vec<RawSelectItem>> {
    let first = item(input, braces)?;
    let rest: Vec<_> =
        repeat(0.., preceded(',', cut_err(|i: &mut Input<'_>| item(i, braces)))).parse_next(input)?;

    let mut items = Vec::with_capacity(rest.len() + 1);
    items.push(first);
    items.extend(rest);
    Ok(items)
}

fn item(input: &mut Input<'_>, braces: bool) -> PResult<RawSelectItem> {
    let ((first, rest), range): ((SelectStep, Vec<SelectStep>), _) = (
        alt((
            |i: &mut Input<'_>| attribute(i, braces),
            |i: &mut Input<'_>| group(i, braces),
        )),
        repeat(0.., next_step),
    )
        .with_span()
        .parse_next(input)?;

    let mut steps = Vec::with_capacity(rest.len() + 1);
    steps.push(first);
    steps.extend(rest);
    Ok(RawSelectItem {
        steps,
        span: Span::from(range),
    })
}

fn next_step(input: &mut Input<'_>) -> PResult<SelectStep> {
    alt((
        preceded('.', cut_err(|i: &mut Input<'_>| attribute(i, false))),
        |i: &mut Input<'_>| group(i, false),
    ))
    .parse_next(input)
}

fn attribute(input: &mut Input<'_>, braces: bool) -> PResult<SelectStep> {
    let name = attribute_name(input, braces)?;
    let parameters = repeat(0.., parameter).parse_next(input)?;
    Ok(SelectStep::Attribute { name, parameters })
}

fn group(input: &mut Input<'_>, braces: bool) -> PResult<SelectStep> {
    let (items, range) = preceded(
        '[',
        cut_err(terminated(
            opt(|i: &mut Input<'_>| list(i, braces)),
            ']'.context(expected("`]`")),
        )),
    )
    .with_span()
    .parse_next(input)?;
    let parameters = repeat(0.., parameter).parse_next(input)?;

    Ok(SelectStep::Group {
        items: items.unwrap_or_default(),
        parameters,
        span: Span::from(range),
    })
}

fn parameter(input: &mut Input<'_>) -> PResult<RawParameter> {
    preceded(
        '(',
        cut_err(terminated(
            (
                identifier,
                preceded('='.context(expected("`=`")), parameter_value),
            ),
            ')'.context(expected("`)`")),
        )),
    )
    .map(|(name, value)| RawParameter { name, value })
    .parse_next(input)
}

/// Reject a parameter given twice on the same name or group
fn check_parameters(items: &[RawSelectItem], source: &str) -> Result<()> {
    for step in items.iter().flat_map(|item| &item.steps) {
        let mut seen = HashSet::new();
        for param in step.parameters() {
            if !seen.insert(param.name.inner.as_str()) {
                return Err(QueryError::syntax_at(
                    FQL0004,
                    format!("parameter `{}` is given more than once", param.name.inner),
                    source,
                    param.name.span,
                ));
            }
        }
        if let SelectStep::Group { items, .. } = step {
            check_parameters(items, source)?;
        }
    }
    Ok(())
}
