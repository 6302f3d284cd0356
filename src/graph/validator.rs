//! Graph creation validation
//!
//! A candidate graph is accepted only if:
//! - it declares at least one vertex
//! - every link endpoint names a declared vertex
//! - the links form no directed cycle (self-loops included)
//!
//! Checks run in that order and the first failure wins.

use super::types::Link;
use std::collections::HashMap;
use thiserror::Error;

/// Which end of a link referenced an unknown vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEnd {
    Source,
    Target,
}

impl LinkEnd {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkEnd::Source => "source",
            LinkEnd::Target => "target",
        }
    }
}

/// Stable machine-readable kind of a validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    EmptyVertexList,
    MissingVertexReference,
    CycleDetected,
}

impl ValidationErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationErrorKind::EmptyVertexList => "empty_vertex_list",
            ValidationErrorKind::MissingVertexReference => "missing_vertex_reference",
            ValidationErrorKind::CycleDetected => "cycle_detected",
        }
    }
}

/// Errors raised while validating a candidate graph
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Vertices list must not be empty")]
    EmptyVertexList,

    #[error("Vertex {name} not found")]
    MissingVertex { end: LinkEnd, name: String },

    #[error("Graph contains a cycle")]
    CycleDetected,
}

impl ValidationError {
    pub fn kind(&self) -> ValidationErrorKind {
        match self {
            ValidationError::EmptyVertexList => ValidationErrorKind::EmptyVertexList,
            ValidationError::MissingVertex { .. } => ValidationErrorKind::MissingVertexReference,
            ValidationError::CycleDetected => ValidationErrorKind::CycleDetected,
        }
    }

    /// Location of the offending field within the request body
    pub fn loc(&self) -> Vec<&'static str> {
        match self {
            ValidationError::EmptyVertexList => vec!["body", "vertices"],
            ValidationError::MissingVertex { end, .. } => vec!["body", "links", end.as_str()],
            ValidationError::CycleDetected => vec!["body"],
        }
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    Finished,
    InProgress,
}

/// Validate a candidate graph before it is persisted
pub fn validate<S: AsRef<str>>(vertices: &[S], links: &[Link]) -> ValidationResult<()> {
    if vertices.is_empty() {
        return Err(ValidationError::EmptyVertexList);
    }

    let mut index: HashMap<&str, usize> = HashMap::with_capacity(vertices.len());
    for vertex in vertices {
        let next = index.len();
        index.entry(vertex.as_ref()).or_insert(next);
    }

    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); index.len()];
    for link in links {
        let source = *index.get(link.source.as_str()).ok_or_else(|| ValidationError::MissingVertex {
            end: LinkEnd::Source,
            name: link.source.clone(),
        })?;
        let target = *index.get(link.target.as_str()).ok_or_else(|| ValidationError::MissingVertex {
            end: LinkEnd::Target,
            name: link.target.clone(),
        })?;
        adjacency[source].push(target);
    }

    check_acyclic(&adjacency)
}

/// Iterative three-colour DFS over an index adjacency list.
///
/// A vertex may sit on the stack more than once; a copy found on top after
/// the vertex was already expanded just finishes it.
fn check_acyclic(adjacency: &[Vec<usize>]) -> ValidationResult<()> {
    let mut state = vec![VisitState::Unvisited; adjacency.len()];
    let mut stack: Vec<usize> = Vec::new();

    for root in 0..adjacency.len() {
        if state[root] != VisitState::Unvisited {
            continue;
        }
        stack.push(root);

        while let Some(&current) = stack.last() {
            if state[current] != VisitState::Unvisited {
                state[current] = VisitState::Finished;
                stack.pop();
                continue;
            }
            state[current] = VisitState::InProgress;

            for &neighbor in &adjacency[current] {
                match state[neighbor] {
                    VisitState::InProgress => return Err(ValidationError::CycleDetected),
                    VisitState::Unvisited => stack.push(neighbor),
                    VisitState::Finished => {}
                }
            }
        }
    }

    Ok(())
}
