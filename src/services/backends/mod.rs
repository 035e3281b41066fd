/// Recommendation model backends
///
/// Each trained model kind is an opaque backend behind one capability:
/// restore parameters from a checkpoint, then rank items for a context.
/// Backends must distinguish "nothing to recommend" (an empty ranked list)
/// from "cannot serve" (an error); the registry relies on that split to keep
/// placeholder models gracefully empty instead of broken.
use std::path::Path;

use crate::error::AppResult;

pub mod ease;
pub mod item_knn;
pub mod placeholder;

pub use ease::Ease;
pub use item_knn::ItemKnn;
pub use placeholder::Placeholder;

/// Capability every backend kind satisfies
#[async_trait::async_trait]
pub trait RecommendBackend: Send + Sync {
    /// Restore model state from a checkpoint and mark the backend ready.
    ///
    /// Idempotent: a second restore on a ready backend is a no-op.
    async fn restore(&self, checkpoint: &Path) -> AppResult<()>;

    /// Rank up to `top_k` items for the given interaction context.
    ///
    /// The context is the ordered list of item ids the user recently touched.
    /// Must not be called before a successful restore.
    async fn recommend(&self, context: &[i64], top_k: usize) -> AppResult<Vec<i64>>;
}

/// Sorts scored candidates into a ranked id list: score descending,
/// ascending id as the tie-break so rankings are deterministic.
pub(crate) fn rank(mut scored: Vec<(i64, f64)>, top_k: usize) -> Vec<i64> {
    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });
    scored.truncate(top_k);
    scored.into_iter().map(|(id, _)| id).collect()
}
