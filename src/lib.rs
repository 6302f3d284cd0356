//! Samyama DAG Service
//!
//! A small HTTP service that stores directed acyclic graphs made of named
//! vertices and directed links.
//!
//! # Architecture
//!
//! - `graph`: pure domain logic, no I/O
//!   - validation of new graphs (vertex references, acyclicity)
//!   - forward and reverse adjacency projection
//! - `persistence`: the [`GraphRepository`] contract with in-memory and
//!   RocksDB backends; every mutation is atomic
//! - `service`: validation in front of storage
//! - `http`: axum routes, request shape checks and error mapping
//!
//! Graphs are created whole in one request. Afterwards only single
//! vertices can be removed; removing the last vertex removes the graph.
//!
//! ## Example Usage
//!
//! ```rust
//! use samyama_dag::graph::{project, validate, Direction, Link};
//!
//! let vertices = ["A", "B"];
//! let links = vec![Link::new("A", "B")];
//!
//! assert!(validate(&vertices, &links).is_ok());
//!
//! let adjacency = project(&vertices, &links, Direction::Forward);
//! assert_eq!(adjacency["A"], vec!["B".to_string()]);
//! assert!(adjacency["B"].is_empty());
//!
//! let cyclic = vec![Link::new("A", "B"), Link::new("B", "A")];
//! assert!(validate(&vertices, &cyclic).is_err());
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod graph;
pub mod http;
pub mod persistence;
pub mod service;

// Re-export main types for convenience
pub use config::{ConfigError, ServerConfig};

pub use graph::{
    AdjacencyMap, Direction, GraphDetails, GraphId, GraphInput, Link, ValidationError, Vertex,
};

pub use persistence::{
    GraphRepository, InMemoryGraphStore, PersistentStorage, StoreError, StoreResult,
    VertexRemoval,
};

pub use service::{GraphService, ServiceError, ServiceResult};

pub use http::{router, HttpServer};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, "0.1.0");
    }
}
