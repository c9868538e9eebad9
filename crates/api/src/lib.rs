//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - Image upload, listing and deletion routes
//! - Health check
//! - Request tracing and CORS

pub mod routes;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use quill_core::media::ImageGateway;
use quill_core::storage::StorageService;

/// Upload gateway backed by OpenDAL.
pub type Gateway = ImageGateway<StorageService>;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Upload gateway for blog images.
    pub gateway: Arc<Gateway>,
    /// Largest accepted request body in bytes.
    pub max_request_bytes: usize,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(DefaultBodyLimit::max(state.max_request_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
