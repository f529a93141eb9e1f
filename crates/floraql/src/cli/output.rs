//! Output formatting utilities

use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::Colorize;
use floraql_diagnostics::QueryError;
use serde_json::Value;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// When to color terminal output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// Set up color output based on user preference
pub fn setup_colors(mode: ColorMode) {
    let enabled = match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => atty::is(atty::Stream::Stderr),
    };
    colored::control::set_override(enabled);
}

/// Format an error for display
///
/// Query errors are shown with their line and column, and with the
/// parameter or hint they carry.
pub fn format_error(error: &anyhow::Error) -> String {
    let mut text = format!("{} {}", "Error:".red().bold(), error);
    if let Some(query_error) = error.downcast_ref::<QueryError>() {
        let diagnostic = query_error.to_diagnostic();
        if let Some(location) = &diagnostic.location {
            text.push_str(&format!(" {}", format!("(at {location})").cyan()));
        }
        text.push_str(&format!(" [{}]", diagnostic.code));
        if let Some(help) = &diagnostic.help {
            text.push_str(&format!("\n  {} {help}", "help:".yellow().bold()));
        }
    }
    text
}

/// Format a success message for display
pub fn format_success(message: &str) -> String {
    format!("{} {}", "Success:".green().bold(), message)
}

/// Write output to a file or stdout
pub fn write_output(content: &str, output_file: Option<&Path>) -> Result<()> {
    if let Some(path) = output_file {
        let mut file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        writeln!(file, "{content}")
            .with_context(|| format!("Failed to write to output file: {}", path.display()))?;
        log::info!("{}", format_success(&format!("Output written to {}", path.display())));
    } else {
        println!("{content}");
    }
    Ok(())
}

/// Format JSON value for output
pub fn format_json(value: &Value, pretty: bool) -> Result<String> {
    if pretty {
        serde_json::to_string_pretty(value).context("Failed to serialize JSON")
    } else {
        serde_json::to_string(value).context("Failed to serialize JSON")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floraql_diagnostics::{FQL0001, Span};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_format_json() {
        let value = json!({ "a": {} });
        assert_eq!(format_json(&value, false).unwrap(), r#"{"a":{}}"#);
        assert_eq!(format_json(&value, true).unwrap(), "{\n  \"a\": {}\n}");
    }

    #[test]
    fn test_format_error_shows_location() {
        colored::control::set_override(false);
        let err = QueryError::syntax_at(FQL0001, "unexpected `)`", "a)", Span::new(1, 2));
        let text = format_error(&anyhow::Error::new(err));
        assert!(text.starts_with("Error: unexpected `)` (at 1:2) [FQL0001]"), "{text}");
    }

    #[test]
    fn test_write_output_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_output("{}", Some(&path)).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}\n");
    }
}
