//! Router configuration for the web server.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use super::handlers;
use super::AppState;

/// Maximum accepted upload size. Phone camera shots run large.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/receipt/extract-receipt-details",
            post(handlers::extract_receipt_details),
        )
        .route("/receipts", get(handlers::list_receipts))
        // Stored images referenced by image_url
        .nest_service("/uploads", ServeDir::new(state.uploads_dir.clone()))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
