//! CLI functionality for the `floraql` tool
//!
//! - [`commands`]: one runner per subcommand, each producing JSON
//! - [`output`]: colors, error rendering and output files
//! - [`logger`]: the stderr `log` backend

pub mod commands;
pub mod logger;
pub mod output;
