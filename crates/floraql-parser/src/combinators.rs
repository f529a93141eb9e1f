//! Lexical building blocks shared by the filter and select grammars

use floraql_ast::Literal;
use floraql_diagnostics::{FQL0001, FQL0002, FQL0006, FQL0007, QueryError, Result, Span, Spanned};
use rust_decimal::Decimal;
use std::ops::Range;
use std::str::FromStr;
use thiserror::Error;
use winnow::ascii::{digit1, multispace0, multispace1};
use winnow::combinator::{alt, cut_err, opt, preceded, repeat, terminated};
use winnow::error::{ContextError, ErrMode, FromExternalError, ParseError, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::stream::{LocatingSlice, Stream};
use winnow::token::{one_of, take, take_while};

/// Parser input: the source text plus the byte offset into it
pub type Input<'a> = LocatingSlice<&'a str>;

pub type PResult<O> = winnow::ModalResult<O>;

pub fn input(source: &str) -> Input<'_> {
    LocatingSlice::new(source)
}

pub fn expected(what: &'static str) -> StrContext {
    StrContext::Expected(StrContextValue::Description(what))
}

/// Optional whitespace
pub fn ws(input: &mut Input<'_>) -> PResult<()> {
    multispace0.void().parse_next(input)
}

/// `AND` / `OR` with mandatory whitespace on both sides
pub fn connective<'a>(keyword: &'static str) -> impl Parser<Input<'a>, (), ErrMode<ContextError>> {
    (multispace1, keyword, multispace1).void()
}

pub fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn spanned(text: &str, range: Range<usize>) -> Spanned<String> {
    Spanned::new(text.to_string(), Span::from(range))
}

pub fn identifier(input: &mut Input<'_>) -> PResult<Spanned<String>> {
    take_while(1.., is_identifier_char)
        .with_span()
        .map(|(name, range): (&str, Range<usize>)| spanned(name, range))
        .context(expected("attribute name"))
        .parse_next(input)
}

/// Identifier that may also contain `{` and `}` when `braces` is set
pub fn attribute_name(input: &mut Input<'_>, braces: bool) -> PResult<Spanned<String>> {
    if !braces {
        return identifier(input);
    }
    take_while(1.., |c: char| is_identifier_char(c) || c == '{' || c == '}')
        .with_span()
        .map(|(name, range): (&str, Range<usize>)| spanned(name, range))
        .context(expected("attribute name"))
        .parse_next(input)
}

enum Fragment<'a> {
    Plain(&'a str),
    Escaped(char),
}

fn fragment<'a>(input: &mut Input<'a>) -> PResult<Fragment<'a>> {
    alt((
        take_while(1.., |c: char| c != '"' && c != '\\').map(Fragment::Plain),
        preceded('\\', cut_err(one_of(['"', '\\']).context(expected("`\"` or `\\` after `\\`"))))
            .map(Fragment::Escaped),
    ))
    .parse_next(input)
}

/// Double-quoted string; `\"` and `\\` are the only escapes
pub fn string_literal(input: &mut Input<'_>) -> PResult<String> {
    let fragments: Vec<Fragment<'_>> = preceded(
        '"',
        terminated(
            repeat(0.., fragment),
            cut_err('"').context(expected("closing `\"`")),
        ),
    )
    .parse_next(input)?;

    let mut value = String::new();
    for fragment in fragments {
        match fragment {
            Fragment::Plain(text) => value.push_str(text),
            Fragment::Escaped(c) => value.push(c),
        }
    }
    Ok(value)
}

/// A numeric literal with no exact [`Literal`] representation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumberError {
    #[error("number `{0}` is out of range")]
    OutOfRange(String),
    #[error("number `{0}` has more digits than can be kept without rounding")]
    Inexact(String),
}

impl NumberError {
    fn text(&self) -> &str {
        match self {
            Self::OutOfRange(text) | Self::Inexact(text) => text,
        }
    }
}

/// Integers that overflow `i64` are kept as decimals
fn number_value(text: &str) -> std::result::Result<Literal, NumberError> {
    if !text.contains('.') {
        if let Ok(integer) = text.parse::<i64>() {
            return Ok(Literal::Integer(integer));
        }
    }
    match Decimal::from_str_exact(text) {
        Ok(decimal) => Ok(Literal::Float(decimal)),
        Err(_) if Decimal::from_str(text).is_ok() => Err(NumberError::Inexact(text.to_string())),
        Err(_) => Err(NumberError::OutOfRange(text.to_string())),
    }
}

/// `-?digits(.digits)?`
fn number_text<'a>(input: &mut Input<'a>) -> PResult<&'a str> {
    (opt('-'), digit1, opt(('.', digit1))).take().parse_next(input)
}

/// A number that cannot be represented is a cut error located at its first
/// character, carrying the [`NumberError`] as cause.
pub fn number_literal(input: &mut Input<'_>) -> PResult<Literal> {
    let start = input.checkpoint();
    let text = number_text(input)?;
    match number_value(text) {
        Ok(literal) => Ok(literal),
        Err(err) => {
            input.reset(&start);
            Err(ErrMode::Cut(ContextError::from_external_error(&*input, err)))
        }
    }
}

fn keyword_literal(input: &mut Input<'_>) -> PResult<Literal> {
    take_while(1.., is_identifier_char)
        .verify_map(|word: &str| match word {
            "true" => Some(Literal::Boolean(true)),
            "false" => Some(Literal::Boolean(false)),
            "null" => Some(Literal::Null),
            _ => None,
        })
        .parse_next(input)
}

/// A scalar value: string, number, `true`, `false` or `null`
pub fn literal(input: &mut Input<'_>) -> PResult<Literal> {
    alt((string_literal.map(Literal::String), number_literal, keyword_literal))
        .context(expected("value"))
        .parse_next(input)
}

/// Tracks whether a scan is inside a double-quoted string
#[derive(Default)]
struct Quotes {
    in_string: bool,
    escaped: bool,
}

impl Quotes {
    /// Feed one char; true when it belongs to a string, quotes included
    fn skip(&mut self, c: char) -> bool {
        if self.in_string {
            if self.escaped {
                self.escaped = false;
            } else if c == '\\' {
                self.escaped = true;
            } else if c == '"' {
                self.in_string = false;
            }
            return true;
        }
        self.in_string = c == '"';
        self.in_string
    }
}

/// Length in chars of a parameter value: everything up to the `)` closing
/// the parameter group, skipping nested parentheses and quoted strings.
fn parameter_value_len(text: &str) -> usize {
    let mut depth = 0usize;
    let mut quotes = Quotes::default();
    for (count, c) in text.chars().enumerate() {
        if quotes.skip(c) {
            continue;
        }
        match c {
            '(' => depth += 1,
            ')' if depth == 0 => return count,
            ')' => depth -= 1,
            _ => {}
        }
    }
    text.chars().count()
}

/// Reject `source` when its `(`/`[` nesting goes deeper than `max_depth`
///
/// Runs before the recursive grammars so their stack use stays bounded.
/// Brackets inside quoted strings are not counted, and unbalanced closers
/// are left for the grammar to report.
pub fn check_nesting(source: &str, max_depth: usize) -> Result<()> {
    let mut depth = 0usize;
    let mut quotes = Quotes::default();
    for (offset, c) in source.char_indices() {
        if quotes.skip(c) {
            continue;
        }
        match c {
            '(' | '[' => {
                depth += 1;
                if depth > max_depth {
                    return Err(QueryError::syntax_at(
                        FQL0006,
                        format!("expression is nested more than {max_depth} levels deep"),
                        source,
                        Span::new(offset, offset + 1),
                    ));
                }
            }
            ')' | ']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

/// Raw text of a select parameter value, kept for the value's own parser
pub fn parameter_value(input: &mut Input<'_>) -> PResult<Spanned<String>> {
    let len = parameter_value_len(input.peek_finish());
    take(len)
        .verify(|value: &str| !value.is_empty())
        .with_span()
        .map(|(value, range): (&str, Range<usize>)| spanned(value, range))
        .context(expected("parameter value"))
        .parse_next(input)
}

/// Turn a winnow failure into a located syntax error
pub fn syntax_error(source: &str, error: &ParseError<Input<'_>, ContextError>) -> QueryError {
    let offset = error.offset();
    if let Some(number) = error.inner().cause().and_then(|cause| cause.downcast_ref::<NumberError>()) {
        let span = Span::new(offset, offset + number.text().len());
        return QueryError::syntax_at(FQL0007, number.to_string(), source, span);
    }

    let mut expected: Vec<String> = Vec::new();
    for context in error.inner().context() {
        if let StrContext::Expected(value) = context {
            let value = value.to_string();
            if !expected.contains(&value) {
                expected.push(value);
            }
        }
    }

    let found = source.get(offset..).and_then(|rest| rest.chars().next());
    let (code, span, mut message) = match found {
        Some(c) => (
            FQL0001,
            Span::new(offset, offset + c.len_utf8()),
            format!("unexpected `{c}`"),
        ),
        None => (FQL0002, Span::point(offset), "unexpected end of input".to_string()),
    };
    if !expected.is_empty() {
        message.push_str(", expected ");
        message.push_str(&expected.join(" or "));
    }
    QueryError::syntax_at(code, message, source, span)
}
