//! Response sanitization and fragment parsing
//!
//! Models frequently wrap JSON in Markdown code fences or surround it with
//! prose despite instructions. This module strips that noise before parsing
//! the response into a [`SpecFragment`].

use regex::Regex;
use thiserror::Error;
use tracing::{debug, warn};

use super::merge::SpecFragment;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),
    #[error("No JSON object found in response")]
    NoJsonObject,
}

/// Parses a raw model response into a fragment.
pub fn parse_fragment(response: &str) -> Result<SpecFragment, ParseError> {
    debug!("Parsing response ({} chars)", response.len());

    let json_str = extract_json_from_response(response)?;

    serde_json::from_str(&json_str).map_err(|e| {
        warn!("JSON parse error: {}", e);
        ParseError::InvalidJson(format!(
            "{}: {}",
            e,
            json_str.chars().take(100).collect::<String>()
        ))
    })
}

/// Extracts the JSON object from a response, tolerating code fences and
/// surrounding prose.
pub fn extract_json_from_response(response: &str) -> Result<String, ParseError> {
    let trimmed = response.trim();

    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        return Ok(trimmed.to_string());
    }

    if trimmed.contains("```") {
        return extract_from_markdown_block(trimmed);
    }

    if let Some(start) = trimmed.find('{') {
        if let Some(end) = trimmed.rfind('}') {
            if start < end {
                return Ok(trimmed[start..=end].to_string());
            }
        }
    }

    Err(ParseError::NoJsonObject)
}

fn extract_from_markdown_block(text: &str) -> Result<String, ParseError> {
    let re = Regex::new(r"```(?:json)?\s*\n?([\s\S]*?)\n?```").unwrap();

    if let Some(captures) = re.captures(text) {
        if let Some(json_match) = captures.get(1) {
            let json = json_match.as_str().trim();
            if json.starts_with('{') && json.ends_with('}') {
                return Ok(json.to_string());
            }
        }
    }

    Err(ParseError::NoJsonObject)
}
