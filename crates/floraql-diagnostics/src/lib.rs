//! floraql diagnostics and error handling
//!
//! Error codes, byte spans with line/column resolution, and the
//! [`QueryError`] type shared by every floraql crate.

mod error;
mod error_code;
mod span;

pub use error::*;
pub use error_code::*;
pub use span::*;

/// Result type for floraql operations
pub type Result<T> = std::result::Result<T, QueryError>;
