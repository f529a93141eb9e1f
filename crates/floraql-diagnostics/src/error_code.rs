//! floraql error codes
//!
//! Error code ranges:
//! - FQL0001-FQL0099: Syntax errors (grammar)
//! - FQL0100-FQL0199: Semantic errors (merging, operator legality, configuration)
//! - FQL0200-FQL0299: Request errors (scalar validation, dispatching)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Error code identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode(u16);

impl ErrorCode {
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    pub const fn code(&self) -> u16 {
        self.0
    }

    /// Static description of this code
    pub fn info(&self) -> &'static ErrorInfo {
        ERROR_INFO.get(&self.0).unwrap_or(&UNKNOWN_ERROR)
    }

    pub const fn is_syntax_error(&self) -> bool {
        self.0 >= 1 && self.0 < 100
    }

    pub const fn is_semantic_error(&self) -> bool {
        self.0 >= 100 && self.0 < 200
    }

    pub const fn is_request_error(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FQL{:04}", self.0)
    }
}

/// Information about an error code
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    pub description: &'static str,
    pub help: Option<&'static str>,
}

impl ErrorInfo {
    const fn new(description: &'static str) -> Self {
        Self {
            description,
            help: None,
        }
    }

    const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

static UNKNOWN_ERROR: ErrorInfo = ErrorInfo::new("Unknown error");

static ERROR_INFO: LazyLock<HashMap<u16, ErrorInfo>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Syntax errors (0001-0099)
    map.insert(1, ErrorInfo::new("Unexpected token"));
    map.insert(2, ErrorInfo::new("Unexpected end of input"));
    map.insert(3, ErrorInfo::new("Empty expression"));
    map.insert(4, ErrorInfo::new("Duplicate parameter")
        .with_help("Each parameter may only be given once per attribute"));
    map.insert(5, ErrorInfo::new("Missing comparison operator"));
    map.insert(6, ErrorInfo::new("Nesting too deep")
        .with_help("Flatten the expression or raise the configured maximum depth"));
    map.insert(7, ErrorInfo::new("Number out of range")
        .with_help("Quote the number to compare it as a string"));

    // Semantic errors (0100-0199)
    map.insert(100, ErrorInfo::new("Cannot merge conflicting options")
        .with_help("Give the parameters of an attribute only once"));
    map.insert(101, ErrorInfo::new("Invalid range operator")
        .with_help("Ranges can only be compared with = or !="));
    map.insert(102, ErrorInfo::new("Empty child group"));
    map.insert(103, ErrorInfo::new("Unknown operator"));
    map.insert(104, ErrorInfo::new("Reserved parameter name"));
    map.insert(105, ErrorInfo::new("Invalid configuration"));

    // Request errors (0200-0299)
    map.insert(200, ErrorInfo::new("Invalid request"));
    map.insert(201, ErrorInfo::new("Invalid type"));
    map.insert(202, ErrorInfo::new("Value out of range"));
    map.insert(203, ErrorInfo::new("Invalid order"));
    map.insert(204, ErrorInfo::new("Not implemented"));

    map
});

// Syntax errors
pub const FQL0001: ErrorCode = ErrorCode::new(1);
pub const FQL0002: ErrorCode = ErrorCode::new(2);
pub const FQL0003: ErrorCode = ErrorCode::new(3);
pub const FQL0004: ErrorCode = ErrorCode::new(4);
pub const FQL0005: ErrorCode = ErrorCode::new(5);
pub const FQL0006: ErrorCode = ErrorCode::new(6);
pub const FQL0007: ErrorCode = ErrorCode::new(7);

// Semantic errors
pub const FQL0100: ErrorCode = ErrorCode::new(100);
pub const FQL0101: ErrorCode = ErrorCode::new(101);
pub const FQL0102: ErrorCode = ErrorCode::new(102);
pub const FQL0103: ErrorCode = ErrorCode::new(103);
pub const FQL0104: ErrorCode = ErrorCode::new(104);
pub const FQL0105: ErrorCode = ErrorCode::new(105);

// Request errors
pub const FQL0200: ErrorCode = ErrorCode::new(200);
pub const FQL0201: ErrorCode = ErrorCode::new(201);
pub const FQL0202: ErrorCode = ErrorCode::new(202);
pub const FQL0203: ErrorCode = ErrorCode::new(203);
pub const FQL0204: ErrorCode = ErrorCode::new(204);
