use axum::{extract::State, http::HeaderMap, Json};
use serde_json::json;

use crate::{
    error::{AppError, AppResult},
    services::RecommendRequest,
};

use super::{catalog::MovieResponse, AppState};

/// Serves movie recommendations
///
/// The bearer token is resolved permissively before serving: a missing or
/// unusable token only means the logged interactions go unattributed, it
/// never gates the recommendation itself.
pub async fn recommend(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Option<Json<RecommendRequest>>,
) -> AppResult<Json<serde_json::Value>> {
    let Some(Json(request)) = body else {
        return Err(AppError::MissingData);
    };

    let user_id = state.tokens.resolve_optional(&headers);
    let movies = state.gateway.serve(request, user_id).await?;

    let items: Vec<MovieResponse> = movies.iter().map(MovieResponse::from).collect();
    Ok(Json(json!({ "result": items })))
}
