use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::json;

use crate::{db::Store, error::AppResult, models::Movie};

use super::AppState;

/// Wire shape of a catalog item
#[derive(Debug, Serialize)]
pub struct MovieResponse {
    pub id: i64,
    pub title: String,
    pub genre: String,
    /// `YYYY-Mon-DD`, or null when the catalog has no release date
    pub date: Option<String>,
}

impl From<&Movie> for MovieResponse {
    fn from(movie: &Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            genre: movie.genre.clone(),
            date: movie.formatted_date(),
        }
    }
}

/// Returns the full catalog, sorted ascending by id
pub async fn init(State(state): State<AppState>) -> AppResult<Json<serde_json::Value>> {
    let mut movies = state.store.all_movies().await?;
    movies.sort_by_key(|m| m.id);

    let items: Vec<MovieResponse> = movies.iter().map(MovieResponse::from).collect();
    Ok(Json(json!({ "result": items })))
}
