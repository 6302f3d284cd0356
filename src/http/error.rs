//! Mapping of service failures onto HTTP responses

use super::schema::{ErrorDetail, ErrorResponse, LocSegment, ValidationErrorResponse};
use crate::persistence::StoreError;
use crate::service::ServiceError;
use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

/// Errors returned by handlers
#[derive(Error, Debug)]
pub enum ApiError {
    /// 422 with field locations
    #[error("Unprocessable request ({} errors)", .0.len())]
    Unprocessable(Vec<ErrorDetail>),

    /// 400 with field locations
    #[error("Bad request ({} errors)", .0.len())]
    BadRequest(Vec<ErrorDetail>),

    #[error("{0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(e) => ApiError::Unprocessable(vec![ErrorDetail::from(&e)]),
            ServiceError::Store(StoreError::GraphNotFound(_)) => {
                ApiError::NotFound("Graph not found".to_string())
            }
            ServiceError::Store(StoreError::VertexNotFound { .. }) => {
                ApiError::NotFound("Vertex not found".to_string())
            }
            ServiceError::Store(StoreError::DuplicateLink(_)) => ApiError::BadRequest(vec![
                ErrorDetail::value_error(&["body", "links"], "Duplicate links detected"),
            ]),
            ServiceError::Store(StoreError::DuplicateVertex(name)) => ApiError::BadRequest(vec![
                ErrorDetail::value_error(&["body", "vertices"], format!("Duplicate vertex {}", name)),
            ]),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Unprocessable(vec![ErrorDetail::new(
            vec![LocSegment::from("body")],
            rejection.body_text(),
            "json_invalid",
        )])
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Unprocessable(vec![ErrorDetail::new(
            vec![LocSegment::from("path"), LocSegment::from("graph_id")],
            format!("Input should be a valid integer: {}", rejection.body_text()),
            "int_parsing",
        )])
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unprocessable(detail) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ValidationErrorResponse { detail }),
            )
                .into_response(),
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, Json(ValidationErrorResponse { detail })).into_response()
            }
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(ErrorResponse { message })).into_response()
            }
            ApiError::Internal(message) => {
                error!("Request failed: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse { message: "Internal server error".to_string() }),
                )
                    .into_response()
            }
        }
    }
}
