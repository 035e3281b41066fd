use std::sync::Arc;

use serde::Deserialize;

use crate::{
    db::Store,
    error::{AppError, AppResult},
    models::Movie,
};

use super::{interactions::InteractionLogger, registry::ModelRegistry};

/// Default number of recommendations when the client does not ask for one
pub const DEFAULT_TOP_K: usize = 10;

/// A recommendation request as received on the wire
#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    /// Ordered item ids of the user's recent interactions
    #[serde(default)]
    pub context: Vec<i64>,
    /// Name of the model to dispatch to
    pub model: Option<String>,
    pub top_k: Option<usize>,
}

/// The recommendation serving pipeline
///
/// Validates the request, dispatches to the registry, enriches ranked ids
/// with catalog records, and hands the served ids to the interaction logger
/// on a detached task so logging can never delay or fail the response.
#[derive(Clone)]
pub struct Gateway {
    registry: Arc<ModelRegistry>,
    store: Arc<dyn Store>,
    logger: InteractionLogger,
}

impl Gateway {
    pub fn new(registry: Arc<ModelRegistry>, store: Arc<dyn Store>) -> Self {
        let logger = InteractionLogger::new(store.clone());
        Self {
            registry,
            store,
            logger,
        }
    }

    /// Serves one recommendation request for an optionally identified caller
    ///
    /// Validation order is fixed: context, then model name, then registry
    /// lookup. Ranked ids with no catalog match are silently dropped; the
    /// backend's order is preserved, never re-sorted.
    pub async fn serve(
        &self,
        request: RecommendRequest,
        user_id: Option<i64>,
    ) -> AppResult<Vec<Movie>> {
        if request.context.is_empty() {
            return Err(AppError::MissingContext);
        }
        let model = match request.model.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => return Err(AppError::MissingModel),
        };
        let top_k = request.top_k.unwrap_or(DEFAULT_TOP_K);

        let ranked = self.registry.dispatch(model, &request.context, top_k).await?;

        let mut movies = Vec::with_capacity(ranked.len());
        for id in &ranked {
            if let Some(movie) = self.store.movie(*id).await? {
                movies.push(movie);
            }
        }

        tracing::info!(
            model,
            context_len = request.context.len(),
            ranked = ranked.len(),
            served = movies.len(),
            attributed = user_id.is_some(),
            "recommendations served"
        );

        // Fire and forget: the response is complete whatever happens here.
        let logger = self.logger.clone();
        tokio::spawn(async move {
            logger.log_recommend(user_id, &ranked).await;
        });

        Ok(movies)
    }
}
