use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::OnceCell;

use crate::error::{AppError, AppResult};

use super::backends::{Ease, ItemKnn, Placeholder, RecommendBackend};

/// Registered model kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    Ease,
    ItemKnn,
    NeuralMf,
    DeepFm,
}

impl ModelKind {
    /// Resolves the wire-facing model name; names are exact, no aliases.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "EASE" => Some(ModelKind::Ease),
            "ItemKNN" => Some(ModelKind::ItemKnn),
            "NeuralMF" => Some(ModelKind::NeuralMf),
            "DeepFM" => Some(ModelKind::DeepFm),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ModelKind::Ease => "EASE",
            ModelKind::ItemKnn => "ItemKNN",
            ModelKind::NeuralMf => "NeuralMF",
            ModelKind::DeepFm => "DeepFM",
        }
    }

    fn checkpoint_file(&self) -> &'static str {
        match self {
            ModelKind::Ease => "EASE_100.json",
            ModelKind::ItemKnn => "ItemKNN_100.json",
            // Nominal paths; placeholders load no real state.
            ModelKind::NeuralMf => "NeuralMF_placeholder.pth",
            ModelKind::DeepFm => "DeepFM_placeholder.pth",
        }
    }
}

struct ModelEntry {
    checkpoint: PathBuf,
    backend: Arc<dyn RecommendBackend>,
    /// Guards the one-time restore: concurrent first dispatches for the same
    /// kind queue behind a single load instead of each triggering one.
    loaded: OnceCell<()>,
}

/// Registry mapping model names to backend instances
///
/// Owns one lazily restored backend per kind for the process lifetime.
/// `dispatch` auto-loads before the first recommend so an unrestored backend
/// is never invoked, and bounds the whole call with a timeout.
pub struct ModelRegistry {
    entries: HashMap<ModelKind, ModelEntry>,
    dispatch_timeout: Duration,
}

impl ModelRegistry {
    /// Empty registry; `register` each kind explicitly (used by tests)
    pub fn new(dispatch_timeout: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            dispatch_timeout,
        }
    }

    /// Registry with the four production model kinds, checkpoints resolved
    /// under `checkpoint_dir`
    pub fn with_defaults(checkpoint_dir: &Path, dispatch_timeout: Duration) -> Self {
        let mut registry = Self::new(dispatch_timeout);
        registry.register(ModelKind::Ease, Arc::new(Ease::new()), checkpoint_dir);
        registry.register(ModelKind::ItemKnn, Arc::new(ItemKnn::new()), checkpoint_dir);
        registry.register(
            ModelKind::NeuralMf,
            Arc::new(Placeholder::new("NeuralMF")),
            checkpoint_dir,
        );
        registry.register(
            ModelKind::DeepFm,
            Arc::new(Placeholder::new("DeepFM")),
            checkpoint_dir,
        );
        registry
    }

    /// Registers (or replaces) the backend instance serving `kind`
    pub fn register(
        &mut self,
        kind: ModelKind,
        backend: Arc<dyn RecommendBackend>,
        checkpoint_dir: &Path,
    ) {
        self.entries.insert(
            kind,
            ModelEntry {
                checkpoint: checkpoint_dir.join(kind.checkpoint_file()),
                backend,
                loaded: OnceCell::new(),
            },
        );
    }

    /// Dispatches a recommendation request to the named backend
    ///
    /// Unknown names fail fast with `UnknownModel`; context and top-k are
    /// forwarded unchanged. Exceeding the dispatch timeout is reported as a
    /// backend failure, not a hang.
    pub async fn dispatch(
        &self,
        model_name: &str,
        context: &[i64],
        top_k: usize,
    ) -> AppResult<Vec<i64>> {
        let kind = ModelKind::from_name(model_name)
            .ok_or_else(|| AppError::UnknownModel(model_name.to_string()))?;
        let entry = self
            .entries
            .get(&kind)
            .ok_or_else(|| AppError::UnknownModel(model_name.to_string()))?;

        let call = async {
            entry
                .loaded
                .get_or_try_init(|| entry.backend.restore(&entry.checkpoint))
                .await?;
            entry.backend.recommend(context, top_k).await
        };

        match tokio::time::timeout(self.dispatch_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(AppError::Backend(format!(
                "{} dispatch exceeded {:?}",
                kind.name(),
                self.dispatch_timeout
            ))),
        }
    }
}
