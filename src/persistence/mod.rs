//! Persistence layer for stored DAGs
//!
//! The service talks to storage only through [`GraphRepository`]. Each
//! mutating call is one transaction: it either applies completely or
//! leaves the store untouched.
//!
//! Two backends are provided:
//! - [`InMemoryGraphStore`]: lock-guarded maps, nothing survives a restart
//! - [`PersistentStorage`]: RocksDB with atomic write batches

pub mod memory;
pub mod storage;

pub use memory::InMemoryGraphStore;
pub use storage::PersistentStorage;

use crate::graph::{GraphDetails, GraphId, Link, Vertex};
use std::collections::HashSet;
use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// No graph with this id
    #[error("Graph {0} not found")]
    GraphNotFound(GraphId),

    /// Graph exists but has no vertex with this name
    #[error("Vertex {name} not found in graph {graph}")]
    VertexNotFound { graph: GraphId, name: String },

    /// The same ordered pair was submitted twice
    #[error("Duplicate link {0}")]
    DuplicateLink(Link),

    /// The same vertex name was submitted twice
    #[error("Duplicate vertex {0}")]
    DuplicateVertex(String),

    /// RocksDB error
    #[error("RocksDB error: {0}")]
    RocksDb(#[from] rocksdb::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// Column family error
    #[error("Column family error: {0}")]
    ColumnFamily(String),

    /// A writer panicked while holding the store lock
    #[error("Store lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    /// Missing graph or vertex
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::GraphNotFound(_) | StoreError::VertexNotFound { .. })
    }

    /// Uniqueness violation on create
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::DuplicateLink(_) | StoreError::DuplicateVertex(_))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Outcome of a successful vertex deletion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexRemoval {
    /// The vertex and its incident links are gone, the graph remains
    VertexRemoved,
    /// The vertex was the last one, so the graph was deleted too
    GraphRemoved,
}

/// Durable storage for graphs, vertices and links
pub trait GraphRepository: Send + Sync {
    /// Persist a whole graph atomically and allocate its id
    fn create_graph(&self, vertices: &[Vertex], links: &[Link]) -> StoreResult<GraphId>;

    /// Load a graph with its vertices and links in submission order
    fn get_graph(&self, id: GraphId) -> StoreResult<GraphDetails>;

    /// Delete a vertex and every link touching it; the graph goes with its last vertex
    fn delete_vertex(&self, id: GraphId, name: &str) -> StoreResult<VertexRemoval>;

    /// Number of stored graphs
    fn graph_count(&self) -> StoreResult<usize>;
}

/// Enforce the per-graph uniqueness constraints before anything is written
pub(crate) fn check_unique(vertices: &[Vertex], links: &[Link]) -> StoreResult<()> {
    let mut names = HashSet::with_capacity(vertices.len());
    for vertex in vertices {
        if !names.insert(vertex.name.as_str()) {
            return Err(StoreError::DuplicateVertex(vertex.name.clone()));
        }
    }

    let mut pairs = HashSet::with_capacity(links.len());
    for link in links {
        if !pairs.insert((link.source.as_str(), link.target.as_str())) {
            return Err(StoreError::DuplicateLink(link.clone()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_unique() {
        let vertices = vec![Vertex::new("A"), Vertex::new("B")];
        assert!(check_unique(&vertices, &[Link::new("A", "B"), Link::new("B", "A")]).is_ok());

        let err = check_unique(&vertices, &[Link::new("A", "B"), Link::new("A", "B")]).unwrap_err();
        assert!(err.is_conflict());
        assert!(matches!(err, StoreError::DuplicateLink(ref link) if *link == Link::new("A", "B")));
        assert_eq!(err.to_string(), "Duplicate link A -> B");

        let err = check_unique(&[Vertex::new("A"), Vertex::new("A")], &[]).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateVertex(name) if name == "A"));
    }

    #[test]
    fn test_error_classes() {
        assert!(StoreError::GraphNotFound(GraphId::new(1)).is_not_found());
        assert!(StoreError::VertexNotFound { graph: GraphId::new(1), name: "x".into() }.is_not_found());
        assert!(!StoreError::LockPoisoned.is_not_found());
        assert!(!StoreError::LockPoisoned.is_conflict());
    }
}
