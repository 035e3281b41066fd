use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use super::{catalog, interactions, recommend, AppState};

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Serving pipeline
        .route("/recommend", post(recommend::recommend))
        .route("/init", get(catalog::init))
        // Interactions collaborator surface
        .route("/api/interactions", post(interactions::save_interaction))
        .route("/api/interactions", get(interactions::get_user_interactions))
        .route(
            "/api/interactions/batch",
            post(interactions::save_batch_interactions),
        )
        .fallback(not_found)
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

async fn not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "Endpoint not found", "error": "NOT_FOUND" })),
    )
}
