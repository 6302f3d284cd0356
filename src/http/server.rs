//! HTTP server for the graph API

use super::handler::{
    adjacency_handler, create_graph_handler, delete_vertex_handler, get_graph_handler,
    not_found_handler, reverse_adjacency_handler, status_handler,
};
use crate::service::GraphService;
use axum::{
    routing::{delete, get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Build the API router.
///
/// Graph creation and lookup answer with and without a trailing slash.
pub fn router(service: GraphService) -> Router {
    Router::new()
        .route("/api/graph", post(create_graph_handler))
        .route("/api/graph/", post(create_graph_handler))
        .route("/api/graph/:graph_id", get(get_graph_handler))
        .route("/api/graph/:graph_id/", get(get_graph_handler))
        .route("/api/graph/:graph_id/adjacency_list", get(adjacency_handler))
        .route(
            "/api/graph/:graph_id/reverse_adjacency_list",
            get(reverse_adjacency_handler),
        )
        .route("/api/graph/:graph_id/node/:vertex_name", delete(delete_vertex_handler))
        .route("/api/status", get(status_handler))
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(service)
}

/// HTTP server serving the graph API
pub struct HttpServer {
    service: GraphService,
    addr: SocketAddr,
}

impl HttpServer {
    pub fn new(service: GraphService, addr: SocketAddr) -> Self {
        Self { service, addr }
    }

    /// Serve until ctrl-c
    pub async fn start(&self) -> std::io::Result<()> {
        let app = router(self.service.clone());
        let listener = tokio::net::TcpListener::bind(self.addr).await?;

        info!("Graph API listening on http://{}", listener.local_addr()?);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Graph API stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
