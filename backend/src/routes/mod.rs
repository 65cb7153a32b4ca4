//! Route definitions for the Pointcast panel service

use axum::{routing::get, Router};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Panel assembly for a point
        .route("/panel", get(handlers::get_panel))
}
