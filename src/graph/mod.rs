//! DAG domain model
//!
//! This module holds the pure, I/O-free parts of the service:
//! - Graph, vertex and link types
//! - Creation-time validation (references and acyclicity)
//! - Forward and reverse adjacency projection

pub mod adjacency;
pub mod types;
pub mod validator;

// Re-export main types
pub use adjacency::{project, Direction};
pub use types::{AdjacencyMap, GraphDetails, GraphId, GraphInput, Link, Vertex};
pub use validator::{
    validate, LinkEnd, ValidationError, ValidationErrorKind, ValidationResult,
};
