//! HTTP handlers for the graph API

use super::error::ApiError;
use super::schema::{check_graph_input, AdjacencyResponse, GraphIdResponse};
use crate::graph::{Direction, GraphDetails, GraphId, GraphInput};
use crate::service::GraphService;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

/// Ids are allocated from 1, so any integer below that names no graph
fn parse_graph_id(raw: i64) -> Result<GraphId, ApiError> {
    u64::try_from(raw)
        .map(GraphId::new)
        .map_err(|_| ApiError::NotFound("Graph not found".to_string()))
}

/// POST /api/graph/
pub async fn create_graph_handler(
    State(service): State<GraphService>,
    payload: Result<Json<GraphInput>, JsonRejection>,
) -> Result<(StatusCode, Json<GraphIdResponse>), ApiError> {
    let Json(input) = payload?;
    check_graph_input(&input).map_err(ApiError::Unprocessable)?;

    let id = service.create_graph(input).await?;
    Ok((StatusCode::CREATED, Json(GraphIdResponse { id: id.as_u64() })))
}

/// GET /api/graph/{id}/
pub async fn get_graph_handler(
    State(service): State<GraphService>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<GraphDetails>, ApiError> {
    let Path(raw_id) = path?;
    let details = service.get_graph(parse_graph_id(raw_id)?).await?;
    Ok(Json(details))
}

/// GET /api/graph/{id}/adjacency_list
pub async fn adjacency_handler(
    State(service): State<GraphService>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<AdjacencyResponse>, ApiError> {
    adjacency(service, path, Direction::Forward).await
}

/// GET /api/graph/{id}/reverse_adjacency_list
pub async fn reverse_adjacency_handler(
    State(service): State<GraphService>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<AdjacencyResponse>, ApiError> {
    adjacency(service, path, Direction::Reverse).await
}

async fn adjacency(
    service: GraphService,
    path: Result<Path<i64>, PathRejection>,
    direction: Direction,
) -> Result<Json<AdjacencyResponse>, ApiError> {
    let Path(raw_id) = path?;
    let adjacency = service.adjacency(parse_graph_id(raw_id)?, direction).await?;
    Ok(Json(AdjacencyResponse { adjacency }))
}

/// DELETE /api/graph/{id}/node/{name}
pub async fn delete_vertex_handler(
    State(service): State<GraphService>,
    params: Result<Path<(i64, String)>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path((raw_id, vertex_name)) = params?;
    service.delete_vertex(parse_graph_id(raw_id)?, vertex_name).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for system status
pub async fn status_handler(State(service): State<GraphService>) -> Result<impl IntoResponse, ApiError> {
    let graphs = service.graph_count().await?;
    Ok(Json(json!({
        "status": "healthy",
        "version": crate::VERSION,
        "graphs": graphs,
    })))
}

/// Unknown routes
pub async fn not_found_handler() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}
