//! Graph service: validation in front of the repository
//!
//! Creation runs the validator first and only touches storage once the
//! candidate graph is known to be a DAG. Repository calls are blocking and
//! run on the tokio blocking pool.

use crate::graph::{self, AdjacencyMap, Direction, GraphDetails, GraphId, GraphInput, ValidationError};
use crate::persistence::{GraphRepository, StoreError, VertexRemoval};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors surfaced by the service
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The request was rejected before reaching storage
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Storage rejected or failed the operation
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The blocking storage task did not complete
    #[error("Storage task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Entry point for every graph operation
#[derive(Clone)]
pub struct GraphService {
    store: Arc<dyn GraphRepository>,
}

impl GraphService {
    pub fn new(store: Arc<dyn GraphRepository>) -> Self {
        Self { store }
    }

    /// Validate and persist a new graph
    pub async fn create_graph(&self, input: GraphInput) -> ServiceResult<GraphId> {
        let names = input.vertex_names();
        if let Err(e) = graph::validate(&names, &input.links) {
            warn!("Rejected graph ({} vertices, {} links): {}", names.len(), input.links.len(), e);
            return Err(e.into());
        }

        let store = Arc::clone(&self.store);
        let id = tokio::task::spawn_blocking(move || {
            store.create_graph(&input.vertices, &input.links)
        })
        .await??;

        info!("Created graph {} with {} vertices", id, names.len());
        Ok(id)
    }

    pub async fn get_graph(&self, id: GraphId) -> ServiceResult<GraphDetails> {
        let store = Arc::clone(&self.store);
        let details = tokio::task::spawn_blocking(move || store.get_graph(id)).await??;
        Ok(details)
    }

    /// Forward or reverse adjacency of a stored graph
    pub async fn adjacency(&self, id: GraphId, direction: Direction) -> ServiceResult<AdjacencyMap> {
        let details = self.get_graph(id).await?;
        let names: Vec<&str> = details.vertex_names().collect();
        Ok(graph::project(&names, &details.links, direction))
    }

    pub async fn delete_vertex(&self, id: GraphId, name: String) -> ServiceResult<VertexRemoval> {
        let store = Arc::clone(&self.store);
        let vertex = name.clone();
        let removal = tokio::task::spawn_blocking(move || store.delete_vertex(id, &vertex)).await??;

        match removal {
            VertexRemoval::VertexRemoved => info!("Deleted vertex {} from graph {}", name, id),
            VertexRemoval::GraphRemoved => {
                info!("Deleted last vertex {} of graph {}, graph removed", name, id)
            }
        }
        Ok(removal)
    }

    pub async fn graph_count(&self) -> ServiceResult<usize> {
        let store = Arc::clone(&self.store);
        let count = tokio::task::spawn_blocking(move || store.graph_count()).await??;
        Ok(count)
    }
}
