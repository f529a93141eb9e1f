//! Filter grammar
//!
//! ```text
//! filter     := or_expr
//! or_expr    := and_expr ( "OR" and_expr )*
//! and_expr   := term ( "AND" term )*
//! term       := "(" or_expr ")" | path_term
//! path_term  := name ( "." name | "[" or_expr "]" )* ( operator value )?
//! value      := literal ( ".." literal | ( "," literal )+ )?
//! ```
//!
//! Bracket groups are expanded by a rewrite pass once the whole expression
//! has been read: `type[id=1 OR name="x"]` becomes `type.id=1 OR type.name="x"`
//! and `a[b OR c]=1` becomes `a.b=1 OR a.c=1`.

use crate::FilterConfig;
use crate::combinators::{
    Input, PResult, check_nesting, connective, expected, identifier, input, literal, syntax_error, ws,
};
use crate::config::is_operator_char;
use floraql_ast::{AttributePath, FilterNode, RawComparison, Value};
use floraql_diagnostics::{FQL0001, FQL0003, FQL0005, QueryError, Result, Span, Spanned};
use smallvec::smallvec;
use std::ops::Range;
use winnow::combinator::{alt, cut_err, delimited, eof, opt, preceded, repeat, terminated};
use winnow::prelude::*;
use winnow::token::take_while;

/// Parse a filter into its syntax tree, bracket short-hands expanded
pub fn parse_filter_tree(source: &str, config: &FilterConfig) -> Result<FilterNode> {
    if source.trim().is_empty() {
        return Err(QueryError::syntax_at(
            FQL0003,
            "filter expression is empty",
            source,
            Span::point(0),
        ));
    }
    check_nesting(source, config.max_depth())?;

    let term = terminated(
        delimited(ws, |i: &mut Input<'_>| or_expr(i, config), ws),
        eof.context(expected("`AND`, `OR` or end of input")),
    )
    .parse(input(source))
    .map_err(|e| syntax_error(source, &e))?;

    let tree = Expander { source }.finish(term)?;
    log::trace!("filter tree has {} comparisons", tree.comparison_count());
    Ok(tree)
}

#[derive(Debug, Clone)]
enum Term {
    Or(Vec<Term>),
    And(Vec<Term>),
    Path(PathTerm),
}

#[derive(Debug, Clone)]
struct PathTerm {
    head: Spanned<String>,
    steps: Vec<PathStep>,
    comparison: Option<(Spanned<String>, Value)>,
    span: Span,
}

#[derive(Debug, Clone)]
enum PathStep {
    Segment(Spanned<String>),
    Group(Term),
}

fn collapse(mut terms: Vec<Term>, wrap: fn(Vec<Term>) -> Term) -> Term {
    match terms.pop() {
        Some(term) if terms.is_empty() => term,
        Some(term) => {
            terms.push(term);
            wrap(terms)
        }
        None => wrap(terms),
    }
}

fn or_expr(input: &mut Input<'_>, config: &FilterConfig) -> PResult<Term> {
    let mut terms = vec![and_expr(input, config)?];
    while opt(connective("OR")).parse_next(input)?.is_some() {
        terms.push(cut_err(|i: &mut Input<'_>| and_expr(i, config)).parse_next(input)?);
    }
    Ok(collapse(terms, Term::Or))
}

fn and_expr(input: &mut Input<'_>, config: &FilterConfig) -> PResult<Term> {
    let mut terms = vec![term(input, config)?];
    while opt(connective("AND")).parse_next(input)?.is_some() {
        terms.push(cut_err(|i: &mut Input<'_>| term(i, config)).parse_next(input)?);
    }
    Ok(collapse(terms, Term::And))
}

fn term(input: &mut Input<'_>, config: &FilterConfig) -> PResult<Term> {
    let grouped = opt(preceded(
        '(',
        cut_err(terminated(
            delimited(ws, |i: &mut Input<'_>| or_expr(i, config), ws),
            ')'.context(expected("`)`")),
        )),
    ))
    .parse_next(input)?;

    match grouped {
        Some(inner) => Ok(inner),
        None => path_term(input, config).map(Term::Path),
    }
}

fn bracket_group(input: &mut Input<'_>, config: &FilterConfig) -> PResult<Term> {
    preceded(
        '[',
        cut_err(terminated(
            delimited(ws, |i: &mut Input<'_>| or_expr(i, config), ws),
            ']'.context(expected("`]`")),
        )),
    )
    .parse_next(input)
}

fn path_step(input: &mut Input<'_>, config: &FilterConfig) -> PResult<PathStep> {
    alt((
        preceded('.', cut_err(identifier)).map(PathStep::Segment),
        (|i: &mut Input<'_>| bracket_group(i, config)).map(PathStep::Group),
    ))
    .parse_next(input)
}

fn operator(input: &mut Input<'_>, config: &FilterConfig) -> PResult<Spanned<String>> {
    take_while(1.., is_operator_char)
        .verify(|token: &str| config.has_token(token))
        .with_span()
        .map(|(token, range): (&str, Range<usize>)| Spanned::new(token.to_string(), Span::from(range)))
        .parse_next(input)
}

fn value(input: &mut Input<'_>) -> PResult<Value> {
    let first = literal(input)?;
    if let Some(last) = opt(preceded("..", cut_err(literal))).parse_next(input)? {
        return Ok(Value::Range(first, last));
    }
    let rest: Vec<_> = repeat(0.., preceded(',', cut_err(literal))).parse_next(input)?;
    if rest.is_empty() {
        return Ok(Value::Single(first));
    }
    let mut items = Vec::with_capacity(rest.len() + 1);
    items.push(first);
    items.extend(rest);
    Ok(Value::Set(items))
}

fn path_term(input: &mut Input<'_>, config: &FilterConfig) -> PResult<PathTerm> {
    let ((head, steps, comparison), range): ((_, Vec<PathStep>, _), _) = (
        identifier,
        repeat(0.., |i: &mut Input<'_>| path_step(i, config)),
        opt((
            |i: &mut Input<'_>| operator(i, config),
            cut_err(value),
        )),
    )
        .with_span()
        .parse_next(input)?;

    Ok(PathTerm {
        head,
        steps,
        comparison,
        span: Span::from(range),
    })
}

/// Expanded shape of a term: comparisons may still lack their operator
/// while they sit inside a bracket group.
#[derive(Debug, Clone)]
enum Shape {
    Or(Vec<Shape>),
    And(Vec<Shape>),
    Leaf(Leaf),
}

#[derive(Debug, Clone)]
struct Leaf {
    path: AttributePath,
    comparison: Option<(Spanned<String>, Value)>,
    span: Span,
}

impl Shape {
    fn try_map_leaves(self, f: &mut impl FnMut(Leaf) -> Result<Shape>) -> Result<Shape> {
        match self {
            Self::Or(children) => Ok(Self::Or(
                children.into_iter().map(|c| c.try_map_leaves(f)).collect::<Result<_>>()?,
            )),
            Self::And(children) => Ok(Self::And(
                children.into_iter().map(|c| c.try_map_leaves(f)).collect::<Result<_>>()?,
            )),
            Self::Leaf(leaf) => f(leaf),
        }
    }

    fn prefixed(self, prefix: &AttributePath) -> Shape {
        match self {
            Self::Or(children) => Self::Or(children.into_iter().map(|c| c.prefixed(prefix)).collect()),
            Self::And(children) => Self::And(children.into_iter().map(|c| c.prefixed(prefix)).collect()),
            Self::Leaf(mut leaf) => {
                let mut path = prefix.clone();
                path.extend(leaf.path.drain(..));
                leaf.path = path;
                Self::Leaf(leaf)
            }
        }
    }
}

struct Expander<'s> {
    source: &'s str,
}

impl Expander<'_> {
    fn finish(&self, term: Term) -> Result<FilterNode> {
        let shape = self.expand(term)?;
        self.lower(shape)
    }

    fn lower(&self, shape: Shape) -> Result<FilterNode> {
        match shape {
            Shape::Or(children) => Ok(FilterNode::Or(
                children.into_iter().map(|c| self.lower(c)).collect::<Result<_>>()?,
            )),
            Shape::And(children) => Ok(FilterNode::And(
                children.into_iter().map(|c| self.lower(c)).collect::<Result<_>>()?,
            )),
            Shape::Leaf(Leaf {
                path,
                comparison: Some((operator, value)),
                span,
            }) => Ok(FilterNode::Comparison(RawComparison {
                attribute: path,
                operator,
                value,
                span,
            })),
            Shape::Leaf(Leaf { path, span, .. }) => Err(QueryError::syntax_at(
                FQL0005,
                format!("missing comparison operator after `{}`", path.join(".")),
                self.source,
                Span::point(span.end),
            )),
        }
    }

    fn expand(&self, term: Term) -> Result<Shape> {
        match term {
            Term::Or(children) => Ok(Shape::Or(
                children.into_iter().map(|c| self.expand(c)).collect::<Result<_>>()?,
            )),
            Term::And(children) => Ok(Shape::And(
                children.into_iter().map(|c| self.expand(c)).collect::<Result<_>>()?,
            )),
            Term::Path(path) => self.expand_path(path),
        }
    }

    fn expand_path(&self, term: PathTerm) -> Result<Shape> {
        let mut shape = Shape::Leaf(Leaf {
            path: smallvec![term.head.inner],
            comparison: None,
            span: term.span,
        });

        for step in term.steps {
            match step {
                PathStep::Segment(segment) => {
                    shape = shape.try_map_leaves(&mut |mut leaf| {
                        self.ensure_open(&leaf, segment.span)?;
                        leaf.path.push(segment.inner.clone());
                        Ok(Shape::Leaf(leaf))
                    })?;
                }
                PathStep::Group(group) => {
                    let group_span = group_start(&group);
                    let inner = self.expand(group)?;
                    shape = shape.try_map_leaves(&mut |leaf| {
                        self.ensure_open(&leaf, group_span)?;
                        Ok(inner.clone().prefixed(&leaf.path))
                    })?;
                }
            }
        }

        if let Some((operator, value)) = term.comparison {
            shape = shape.try_map_leaves(&mut |mut leaf| {
                self.ensure_open(&leaf, operator.span)?;
                leaf.comparison = Some((operator.clone(), value.clone()));
                Ok(Shape::Leaf(leaf))
            })?;
        }
        Ok(shape)
    }

    /// A leaf that already holds a comparison cannot be extended
    fn ensure_open(&self, leaf: &Leaf, at: Span) -> Result<()> {
        match &leaf.comparison {
            None => Ok(()),
            Some((operator, _)) => Err(QueryError::syntax_at(
                FQL0001,
                format!(
                    "`{}` already has a comparison (`{}`), nothing may follow it",
                    leaf.path.join("."),
                    operator.inner
                ),
                self.source,
                at,
            )),
        }
    }
}

/// Span of the first name inside a group, used to point at the group
fn group_start(term: &Term) -> Span {
    match term {
        Term::Or(children) | Term::And(children) => children.first().map_or(Span::point(0), group_start),
        Term::Path(path) => path.head.span,
    }
}
