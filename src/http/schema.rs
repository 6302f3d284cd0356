//! Wire schema for the graph API
//!
//! Field shape rules (name pattern and length) are enforced here, before a
//! request reaches the validator. Error bodies come in two shapes:
//! - `{"detail": [{"loc": [...], "msg": "...", "type": "..."}]}` for rejected input
//! - `{"message": "..."}` for everything else

use crate::graph::{AdjacencyMap, GraphInput, ValidationError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Longest accepted vertex name, in characters
pub const MAX_NAME_LEN: usize = 255;

/// Vertex names are plain ASCII letters
pub const NAME_PATTERN: &str = "^[a-zA-Z]+$";

static NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(NAME_PATTERN).expect("name pattern is a valid regex"));

/// One segment of an error location path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocSegment {
    Index(usize),
    Key(String),
}

impl From<&str> for LocSegment {
    fn from(key: &str) -> Self {
        LocSegment::Key(key.to_string())
    }
}

impl From<usize> for LocSegment {
    fn from(index: usize) -> Self {
        LocSegment::Index(index)
    }
}

/// A single rejected field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub loc: Vec<LocSegment>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ErrorDetail {
    pub fn new(loc: Vec<LocSegment>, msg: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            loc,
            msg: msg.into(),
            kind: kind.into(),
        }
    }

    /// Detail for a validator or uniqueness failure
    pub fn value_error(loc: &[&str], msg: impl Into<String>) -> Self {
        Self::new(loc.iter().map(|s| LocSegment::from(*s)).collect(), msg, "value_error")
    }
}

impl From<&ValidationError> for ErrorDetail {
    fn from(err: &ValidationError) -> Self {
        ErrorDetail::value_error(&err.loc(), err.to_string())
    }
}

/// Body of a 422 (or 400) response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorResponse {
    pub detail: Vec<ErrorDetail>,
}

/// Body of a plain error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphIdResponse {
    pub id: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjacencyResponse {
    pub adjacency: AdjacencyMap,
}

fn check_name(name: &str, loc: Vec<LocSegment>) -> Option<ErrorDetail> {
    if name.chars().count() > MAX_NAME_LEN {
        return Some(ErrorDetail::new(
            loc,
            format!("String should have at most {} characters", MAX_NAME_LEN),
            "string_too_long",
        ));
    }
    if !NAME_REGEX.is_match(name) {
        return Some(ErrorDetail::new(
            loc,
            format!("String should match pattern '{}'", NAME_PATTERN),
            "string_pattern_mismatch",
        ));
    }
    None
}

/// Check every name in a creation request; all offending fields are reported
pub fn check_graph_input(input: &GraphInput) -> Result<(), Vec<ErrorDetail>> {
    let mut errors = Vec::new();

    for (i, vertex) in input.vertices.iter().enumerate() {
        let loc = vec!["body".into(), "vertices".into(), i.into(), "name".into()];
        errors.extend(check_name(&vertex.name, loc));
    }
    for (i, link) in input.links.iter().enumerate() {
        for (field, name) in [("source", &link.source), ("target", &link.target)] {
            let loc = vec!["body".into(), "links".into(), i.into(), field.into()];
            errors.extend(check_name(name, loc));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
