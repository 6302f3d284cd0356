//! In-memory graph repository
//!
//! Keeps every graph behind a single `RwLock`. Writers hold the lock for
//! the whole mutation, which gives the same all-or-nothing behaviour as a
//! database transaction.

use super::{check_unique, GraphRepository, StoreError, StoreResult, VertexRemoval};
use crate::graph::{GraphDetails, GraphId, Link, Vertex};
use std::collections::BTreeMap;
use std::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone)]
struct StoredGraph {
    vertices: Vec<Vertex>,
    links: Vec<Link>,
}

#[derive(Debug)]
struct MemoryState {
    next_id: u64,
    graphs: BTreeMap<GraphId, StoredGraph>,
}

/// Volatile graph storage
#[derive(Debug)]
pub struct InMemoryGraphStore {
    state: RwLock<MemoryState>,
}

impl InMemoryGraphStore {
    pub fn new() -> Self {
        InMemoryGraphStore {
            state: RwLock::new(MemoryState {
                next_id: 1,
                graphs: BTreeMap::new(),
            }),
        }
    }
}

impl Default for InMemoryGraphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphRepository for InMemoryGraphStore {
    fn create_graph(&self, vertices: &[Vertex], links: &[Link]) -> StoreResult<GraphId> {
        check_unique(vertices, links)?;

        let mut state = self.state.write().map_err(|_| StoreError::LockPoisoned)?;
        let id = GraphId::new(state.next_id);
        state.next_id += 1;
        state.graphs.insert(
            id,
            StoredGraph {
                vertices: vertices.to_vec(),
                links: links.to_vec(),
            },
        );

        debug!("Stored graph {} ({} vertices, {} links)", id, vertices.len(), links.len());
        Ok(id)
    }

    fn get_graph(&self, id: GraphId) -> StoreResult<GraphDetails> {
        let state = self.state.read().map_err(|_| StoreError::LockPoisoned)?;
        let graph = state.graphs.get(&id).ok_or(StoreError::GraphNotFound(id))?;

        Ok(GraphDetails {
            id,
            vertices: graph.vertices.clone(),
            links: graph.links.clone(),
        })
    }

    fn delete_vertex(&self, id: GraphId, name: &str) -> StoreResult<VertexRemoval> {
        let mut state = self.state.write().map_err(|_| StoreError::LockPoisoned)?;
        let graph = state.graphs.get_mut(&id).ok_or(StoreError::GraphNotFound(id))?;

        let position = graph
            .vertices
            .iter()
            .position(|v| v.name == name)
            .ok_or_else(|| StoreError::VertexNotFound {
                graph: id,
                name: name.to_string(),
            })?;

        graph.vertices.remove(position);
        graph.links.retain(|l| l.source != name && l.target != name);

        if graph.vertices.is_empty() {
            state.graphs.remove(&id);
            debug!("Removed last vertex {} of graph {}, graph deleted", name, id);
            return Ok(VertexRemoval::GraphRemoved);
        }

        debug!("Removed vertex {} from graph {}", name, id);
        Ok(VertexRemoval::VertexRemoved)
    }

    fn graph_count(&self) -> StoreResult<usize> {
        let state = self.state.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(state.graphs.len())
    }
}
