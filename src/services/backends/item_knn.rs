use std::collections::HashMap;
use std::path::Path;

use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};

use super::{rank, RecommendBackend};

/// Per-item neighbor lists: item id → [(neighbor id, similarity)]
type NeighborRows = HashMap<i64, Vec<(i64, f64)>>;

/// Item-based k-nearest-neighbor backend
///
/// The checkpoint holds each item's nearest neighbors with similarity
/// scores. A candidate is scored by its strongest similarity to any context
/// item (neighborhood vote), unlike EASE which sums weights.
#[derive(Default)]
pub struct ItemKnn {
    neighbors: RwLock<Option<NeighborRows>>,
}

impl ItemKnn {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl RecommendBackend for ItemKnn {
    async fn restore(&self, checkpoint: &Path) -> AppResult<()> {
        let mut guard = self.neighbors.write().await;
        if guard.is_some() {
            return Ok(());
        }

        let bytes = tokio::fs::read(checkpoint).await.map_err(|e| {
            AppError::Backend(format!(
                "failed to read ItemKNN checkpoint {}: {e}",
                checkpoint.display()
            ))
        })?;
        let rows: NeighborRows = serde_json::from_slice(&bytes).map_err(|e| {
            AppError::Backend(format!(
                "invalid ItemKNN checkpoint {}: {e}",
                checkpoint.display()
            ))
        })?;

        tracing::info!(
            checkpoint = %checkpoint.display(),
            items = rows.len(),
            "ItemKNN neighbor lists restored"
        );
        *guard = Some(rows);
        Ok(())
    }

    async fn recommend(&self, context: &[i64], top_k: usize) -> AppResult<Vec<i64>> {
        let guard = self.neighbors.read().await;
        let rows = guard
            .as_ref()
            .ok_or_else(|| AppError::Backend("ItemKNN neighbors not restored".to_string()))?;

        let mut scores: HashMap<i64, f64> = HashMap::new();
        for item in context {
            if let Some(neighbors) = rows.get(item) {
                for (candidate, similarity) in neighbors {
                    if context.contains(candidate) {
                        continue;
                    }
                    let entry = scores.entry(*candidate).or_insert(f64::MIN);
                    if *similarity > *entry {
                        *entry = *similarity;
                    }
                }
            }
        }

        Ok(rank(scores.into_iter().collect(), top_k))
    }
}
