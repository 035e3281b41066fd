use axum::{extract::State, http::HeaderMap, Json};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::{
    db::Store,
    error::{AppError, AppResult},
    models::InteractionType,
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct SaveInteractionRequest {
    pub movie_id: Option<i64>,
    pub interaction_type: Option<String>,
    pub rating: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct BatchInteractionsRequest {
    pub interactions: Option<Vec<SaveInteractionRequest>>,
}

fn parse_type(raw: Option<&str>) -> AppResult<InteractionType> {
    match raw {
        None => Ok(InteractionType::View),
        Some(s) => s.parse().map_err(AppError::InvalidInput),
    }
}

/// Saves one interaction for the authenticated user
///
/// Unlike recommend logging, this endpoint is the full upsert: an existing
/// record's type is overwritten and its timestamp refreshed.
pub async fn save_interaction(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Option<Json<SaveInteractionRequest>>,
) -> AppResult<Json<serde_json::Value>> {
    let user = state.tokens.authenticate(&headers, state.store.as_ref()).await?;
    let Some(Json(request)) = body else {
        return Err(AppError::MissingData);
    };

    let movie_id = request
        .movie_id
        .ok_or_else(|| AppError::InvalidInput("movie_id is required".to_string()))?;
    let interaction_type = parse_type(request.interaction_type.as_deref())?;

    if state.store.movie(movie_id).await?.is_none() {
        return Err(AppError::NotFound("Movie not found".to_string()));
    }

    let interaction = state
        .store
        .upsert_interaction(
            user.id,
            movie_id,
            interaction_type,
            request.rating,
            Utc::now().timestamp(),
        )
        .await?;

    Ok(Json(json!({
        "message": "Interaction saved successfully",
        "interaction": interaction,
    })))
}

/// Returns every interaction of the authenticated user
pub async fn get_user_interactions(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<serde_json::Value>> {
    let user = state.tokens.authenticate(&headers, state.store.as_ref()).await?;
    let interactions = state.store.interactions_for_user(user.id).await?;

    Ok(Json(json!({
        "count": interactions.len(),
        "interactions": interactions,
    })))
}

/// Saves several interactions at once, skipping invalid entries
pub async fn save_batch_interactions(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Option<Json<BatchInteractionsRequest>>,
) -> AppResult<Json<serde_json::Value>> {
    let user = state.tokens.authenticate(&headers, state.store.as_ref()).await?;
    let items = body
        .and_then(|Json(request)| request.interactions)
        .ok_or_else(|| AppError::InvalidInput("interactions array is required".to_string()))?;

    let timestamp = Utc::now().timestamp();
    let mut saved = 0usize;
    for item in items {
        let Some(movie_id) = item.movie_id else {
            continue;
        };
        let Ok(interaction_type) = parse_type(item.interaction_type.as_deref()) else {
            continue;
        };
        if state.store.movie(movie_id).await?.is_none() {
            continue;
        }

        state
            .store
            .upsert_interaction(user.id, movie_id, interaction_type, item.rating, timestamp)
            .await?;
        saved += 1;
    }

    Ok(Json(json!({
        "message": format!("Successfully saved {saved} interactions"),
        "count": saved,
    })))
}
