use std::collections::HashMap;
use std::path::Path;

use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};

use super::{rank, RecommendBackend};

/// Sparse item-item weight rows: item id → [(item id, weight)]
type WeightRows = HashMap<i64, Vec<(i64, f64)>>;

/// EASE (Embarrassingly Shallow Autoencoder) backend
///
/// The checkpoint holds the trained item-item weight matrix in sparse JSON
/// form. A candidate's score is the sum of weights from every context item
/// to it; context items themselves are never recommended back.
#[derive(Default)]
pub struct Ease {
    weights: RwLock<Option<WeightRows>>,
}

impl Ease {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl RecommendBackend for Ease {
    async fn restore(&self, checkpoint: &Path) -> AppResult<()> {
        let mut guard = self.weights.write().await;
        if guard.is_some() {
            return Ok(());
        }

        let bytes = tokio::fs::read(checkpoint).await.map_err(|e| {
            AppError::Backend(format!(
                "failed to read EASE checkpoint {}: {e}",
                checkpoint.display()
            ))
        })?;
        let rows: WeightRows = serde_json::from_slice(&bytes).map_err(|e| {
            AppError::Backend(format!(
                "invalid EASE checkpoint {}: {e}",
                checkpoint.display()
            ))
        })?;

        tracing::info!(
            checkpoint = %checkpoint.display(),
            items = rows.len(),
            "EASE weights restored"
        );
        *guard = Some(rows);
        Ok(())
    }

    async fn recommend(&self, context: &[i64], top_k: usize) -> AppResult<Vec<i64>> {
        let guard = self.weights.read().await;
        let rows = guard
            .as_ref()
            .ok_or_else(|| AppError::Backend("EASE weights not restored".to_string()))?;

        let mut scores: HashMap<i64, f64> = HashMap::new();
        for item in context {
            if let Some(neighbors) = rows.get(item) {
                for (candidate, weight) in neighbors {
                    if !context.contains(candidate) {
                        *scores.entry(*candidate).or_insert(0.0) += weight;
                    }
                }
            }
        }

        Ok(rank(scores.into_iter().collect(), top_k))
    }
}
