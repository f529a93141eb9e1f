//! floraql error types

use crate::{ErrorCode, SourceLocation, Span};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A renderable diagnostic: what went wrong, where, and how to fix it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub message: String,
    pub location: Option<SourceLocation>,
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            location: None,
            help: None,
        }
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;
        if let Some(loc) = &self.location {
            write!(f, " at {}", loc)?;
        }
        Ok(())
    }
}

/// Main floraql error type
#[derive(Debug, Clone, Error)]
pub enum QueryError {
    /// The input does not match the grammar
    #[error("{message}")]
    Syntax {
        code: ErrorCode,
        message: String,
        expression: String,
        location: Option<SourceLocation>,
        context: Option<String>,
    },

    /// The input parses but breaks a semantic rule (merge conflict,
    /// range combined with an ordering operator, empty child group, ...)
    #[error("{message}")]
    Semantic {
        code: ErrorCode,
        message: String,
        expression: String,
        location: Option<SourceLocation>,
        context: Option<String>,
    },

    /// A scalar request value has the wrong type or is out of range
    #[error("{message}")]
    Validation { code: ErrorCode, message: String },

    /// A request property failed to parse
    #[error("Cannot parse {key}: {source}")]
    Request {
        key: String,
        source: Box<QueryError>,
    },
}

impl QueryError {
    pub fn syntax(code: ErrorCode, message: impl Into<String>, expression: impl Into<String>) -> Self {
        Self::Syntax {
            code,
            message: message.into(),
            expression: expression.into(),
            location: None,
            context: None,
        }
    }

    /// Create a syntax error pointing at `span` inside `expression`
    pub fn syntax_at(code: ErrorCode, message: impl Into<String>, expression: &str, span: Span) -> Self {
        Self::Syntax {
            code,
            message: message.into(),
            expression: expression.to_string(),
            location: Some(SourceLocation::from_span(span, expression)),
            context: None,
        }
    }

    pub fn semantic(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Semantic {
            code,
            message: message.into(),
            expression: String::new(),
            location: None,
            context: None,
        }
    }

    /// Create a semantic error pointing at `span` inside `expression`
    pub fn semantic_at(code: ErrorCode, message: impl Into<String>, expression: &str, span: Span) -> Self {
        Self::Semantic {
            code,
            message: message.into(),
            expression: expression.to_string(),
            location: Some(SourceLocation::from_span(span, expression)),
            context: None,
        }
    }

    pub fn validation(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Validation {
            code,
            message: message.into(),
        }
    }

    /// Wrap an error raised while parsing the request property `key`
    pub fn request(key: impl Into<String>, source: QueryError) -> Self {
        Self::Request {
            key: key.into(),
            source: Box::new(source),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Syntax { code, .. } => *code,
            Self::Semantic { code, .. } => *code,
            Self::Validation { code, .. } => *code,
            Self::Request { source, .. } => source.code(),
        }
    }

    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            Self::Syntax { location, .. } | Self::Semantic { location, .. } => location.as_ref(),
            Self::Validation { .. } => None,
            Self::Request { source, .. } => source.location(),
        }
    }

    pub fn is_syntax(&self) -> bool {
        match self {
            Self::Syntax { .. } => true,
            Self::Request { source, .. } => source.is_syntax(),
            _ => false,
        }
    }

    pub fn is_semantic(&self) -> bool {
        match self {
            Self::Semantic { .. } => true,
            Self::Request { source, .. } => source.is_semantic(),
            _ => false,
        }
    }

    /// Attach a context note, e.g. the parameter a value belonged to
    pub fn with_context(mut self, note: impl Into<String>) -> Self {
        match &mut self {
            Self::Syntax { context, .. } | Self::Semantic { context, .. } => {
                *context = Some(note.into());
            }
            Self::Validation { .. } | Self::Request { .. } => {}
        }
        self
    }

    /// Re-anchor an error raised on a substring that starts `offset` bytes
    /// into `source`.
    pub fn reanchor(mut self, offset: usize, source: &str) -> Self {
        match &mut self {
            Self::Syntax {
                expression,
                location,
                ..
            }
            | Self::Semantic {
                expression,
                location,
                ..
            } => {
                let span = location
                    .as_ref()
                    .map(|loc| loc.span().shift(offset))
                    .unwrap_or_else(|| Span::point(offset));
                *location = Some(SourceLocation::from_span(span, source));
                *expression = source.to_string();
            }
            Self::Validation { .. } | Self::Request { .. } => {}
        }
        self
    }

    /// Convert to a diagnostic for display
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::new(self.code(), self.to_string());
        if let Some(loc) = self.location() {
            diag = diag.with_location(loc.clone());
        }
        let context = match self {
            Self::Syntax { context, .. } | Self::Semantic { context, .. } => context.clone(),
            _ => None,
        };
        if let Some(help) = context.or_else(|| self.code().info().help.map(str::to_string)) {
            diag = diag.with_help(help);
        }
        diag
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FQL0001, FQL0100, FQL0201};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_semantic_error_location() {
        let err = QueryError::semantic_at(FQL0100, "cannot merge conflicting option `b`", "a(b=c),a(b=d)", Span::new(7, 8))
            .with_context("while merging `a`");

        assert!(err.is_semantic());
        assert_eq!(err.code(), FQL0100);
        assert_eq!(err.location().map(|l| l.column), Some(8));
        assert_eq!(err.to_diagnostic().help.as_deref(), Some("while merging `a`"));
    }

    #[test]
    fn test_request_wraps_message_and_code() {
        let inner = QueryError::validation(FQL0201, "limit must be greater than 0");
        let err = QueryError::request("limit", inner);
        assert_eq!(err.to_string(), "Cannot parse limit: limit must be greater than 0");
        assert_eq!(err.code(), FQL0201);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_reanchor_moves_location() {
        let err = QueryError::syntax_at(FQL0001, "unexpected `x`", "id=x", Span::new(3, 4));
        let err = err.reanchor(11, "foo(filter=id=x)");
        let loc = err.location().cloned();
        assert_eq!(loc, Some(SourceLocation::new(1, 15, 14, 1)));
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = QueryError::syntax_at(FQL0001, "unexpected `)`", "a)", Span::new(1, 2)).to_diagnostic();
        assert_eq!(diag.to_string(), "FQL0001: unexpected `)` at 1:2");
    }
}
