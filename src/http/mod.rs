//! HTTP API layer
//!
//! Decodes requests, checks field shapes, calls the [`GraphService`](crate::service::GraphService)
//! and maps its errors to status codes.

pub mod error;
pub mod handler;
pub mod schema;
pub mod server;

pub use error::ApiError;
pub use server::{router, HttpServer};
