//! Subcommand implementations

use crate::{FilterConfig, SelectOptions, parse_filter_with, parse_order, parse_request_with, parse_select_with};
use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Load the operator table from a JSON file, or use the defaults
pub fn load_config(path: Option<&Path>) -> Result<FilterConfig> {
    let Some(path) = path else {
        return Ok(FilterConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("Invalid config file: {}", path.display()))?;
    log::debug!("loaded filter config from {}", path.display());
    Ok(config)
}

pub fn select(expression: &str, options: &SelectOptions) -> Result<Value> {
    let tree = parse_select_with(expression, options)?;
    Ok(serde_json::to_value(tree)?)
}

pub fn filter(expression: &str, config: &FilterConfig) -> Result<Value> {
    let filter = parse_filter_with(expression, config)?;
    Ok(serde_json::to_value(filter)?)
}

pub fn order(expression: &str) -> Result<Value> {
    let order = parse_order(expression)?;
    Ok(serde_json::to_value(order)?)
}

/// Parse a request object read from `file`, or from stdin when it is piped
pub fn request(file: Option<&Path>, options: &SelectOptions) -> Result<Value> {
    let text = match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read request file: {}", path.display()))?,
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read request from stdin")?;
            buffer
        }
        None => bail!("No request given: pass a file or pipe a JSON object into stdin"),
    };
    request_from_str(&text, options)
}

pub fn request_from_str(text: &str, options: &SelectOptions) -> Result<Value> {
    let input: Value = serde_json::from_str(text).context("Request is not valid JSON")?;
    let request = parse_request_with(&input, options)?;
    Ok(serde_json::to_value(request)?)
}
