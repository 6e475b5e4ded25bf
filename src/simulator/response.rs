//! Simulator response extraction
//!
//! The `ask simulate` command prints a progress line followed by the
//! simulation result as pretty JSON. Extraction first tries to read that JSON
//! and only falls back to scanning the text for the quoted key/value pairs
//!
//! ```text
//! "status": "<A-Z and _>"
//! "caption": "<JSON string body>"
//! ```
//!
//! when no parseable JSON object is present.

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::LazyLock;

use crate::common::{Error, Result};

static STATUS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""status"\s*:\s*"([A-Z_]+)""#).expect("valid status regex"));

static CAPTION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""caption"\s*:\s*"((?:[^"\\]|\\.)*)""#).expect("valid caption regex")
});

/// Outcome of one simulation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulateSkillResponse {
    /// Simulation status, e.g. `SUCCESSFUL` or `IN_PROGRESS`
    pub status: String,
    /// Caption the skill answered with
    pub result: String,
}

impl SimulateSkillResponse {
    /// Status value of a completed simulation
    pub const SUCCESSFUL: &'static str = "SUCCESSFUL";

    pub fn new(status: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            result: result.into(),
        }
    }

    /// Whether the caption can be compared against an expectation
    pub fn is_successful(&self) -> bool {
        self.status == Self::SUCCESSFUL
    }
}

/// Which strategy produced the fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    Json,
    Pattern,
}

/// Extract status and caption from simulator stdout
pub fn parse_output(output: &str) -> Result<(SimulateSkillResponse, Extraction)> {
    if let Some(json) = embedded_json(output) {
        let status = find_string(&json, "status");
        let caption = find_string(&json, "caption");
        if let (Some(status), Some(caption)) = (status, caption) {
            return Ok((SimulateSkillResponse::new(status, caption), Extraction::Json));
        }
        tracing::debug!("JSON output lacks status or caption, falling back to patterns");
    }

    let status = STATUS_PATTERN
        .captures(output)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string());
    let caption = CAPTION_PATTERN
        .captures(output)
        .and_then(|c| c.get(1))
        .map(|m| unescape(m.as_str()));

    match (status, caption) {
        (Some(status), Some(caption)) => Ok((
            SimulateSkillResponse::new(status, caption),
            Extraction::Pattern,
        )),
        (None, Some(_)) => Err(malformed("status", output)),
        (Some(_), None) => Err(malformed("caption", output)),
        (None, None) => Err(malformed("status and caption", output)),
    }
}

fn malformed(missing: &'static str, output: &str) -> Error {
    Error::MalformedResponse {
        missing,
        output: output.to_string(),
    }
}

/// Parse the outermost `{ ... }` span of the output, if any
fn embedded_json(output: &str) -> Option<Value> {
    let start = output.find('{')?;
    let end = output.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str::<Value>(&output[start..=end])
        .ok()
        .filter(Value::is_object)
}

/// Breadth-first search for the first string value stored under `key`
///
/// Breadth-first keeps the top-level `status` ahead of any nested ones.
fn find_string(root: &Value, key: &str) -> Option<String> {
    let mut queue = VecDeque::from([root]);
    while let Some(value) = queue.pop_front() {
        match value {
            Value::Object(map) => {
                if let Some(Value::String(s)) = map.get(key) {
                    return Some(s.clone());
                }
                queue.extend(map.values());
            }
            Value::Array(items) => queue.extend(items.iter()),
            _ => {}
        }
    }
    None
}

/// Decode JSON escapes in a captured string body, keeping it raw if invalid
fn unescape(body: &str) -> String {
    serde_json::from_str::<String>(&format!("\"{body}\"")).unwrap_or_else(|_| body.to_string())
}
