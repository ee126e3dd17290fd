use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;

use super::handlers;
use super::AppState;

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        // Health (public)
        .route("/api/health", get(handlers::health::health_check))
        // Self-service
        .route("/api/validate-identity", post(handlers::identity::validate))
        .route("/api/create-subdomain", post(handlers::subdomains::create))
        .route("/api/create-email", post(handlers::emails::create))
        .route("/api/list-usage", get(handlers::usage::list))
        // Admin (Basic auth gate inside the handlers)
        .route("/api/admin-list", get(handlers::admin::list))
        .route("/api/admin-reset", post(handlers::admin::reset))
        .fallback(not_found)
        .with_state(state)
}

async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Endpoint not found" })),
    )
}
