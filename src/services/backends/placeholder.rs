use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{AppError, AppResult};

use super::RecommendBackend;

/// Placeholder backend for model kinds whose training is not shipped yet
/// (NeuralMF, DeepFM). It declares itself ready without reading checkpoint
/// state and always ranks nothing, which the gateway serves as a valid empty
/// result rather than an error.
pub struct Placeholder {
    model_name: &'static str,
    loaded: AtomicBool,
}

impl Placeholder {
    pub fn new(model_name: &'static str) -> Self {
        Self {
            model_name,
            loaded: AtomicBool::new(false),
        }
    }
}

#[async_trait::async_trait]
impl RecommendBackend for Placeholder {
    async fn restore(&self, checkpoint: &Path) -> AppResult<()> {
        self.loaded.store(true, Ordering::SeqCst);
        tracing::info!(
            model = self.model_name,
            checkpoint = %checkpoint.display(),
            "placeholder model marked ready"
        );
        Ok(())
    }

    async fn recommend(&self, context: &[i64], _top_k: usize) -> AppResult<Vec<i64>> {
        if !self.loaded.load(Ordering::SeqCst) {
            return Err(AppError::Backend(format!(
                "{} placeholder not restored",
                self.model_name
            )));
        }

        tracing::debug!(
            model = self.model_name,
            context_len = context.len(),
            "placeholder backend has nothing to recommend"
        );
        Ok(Vec::new())
    }
}
