use std::sync::Arc;

use chrono::Utc;

use crate::db::Store;

/// Best-effort recorder of served recommendations
///
/// Runs off the response's critical path: every failure is absorbed here and
/// reported only through tracing, never to the caller. There is no retry — a
/// lost write is simply lost.
#[derive(Clone)]
pub struct InteractionLogger {
    store: Arc<dyn Store>,
}

impl InteractionLogger {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Records a `recommend` interaction for each served movie id
    ///
    /// Anonymous calls (`user_id == None`) are a no-op: the recommendation
    /// was served but is not attributed. Pairs that already have a record
    /// keep it untouched, so a prior `rate` or `select` is never downgraded.
    pub async fn log_recommend(&self, user_id: Option<i64>, movie_ids: &[i64]) {
        let Some(user_id) = user_id else {
            return;
        };

        let timestamp = Utc::now().timestamp();
        for &movie_id in movie_ids {
            match self
                .store
                .record_recommend_if_absent(user_id, movie_id, timestamp)
                .await
            {
                Ok(true) => {}
                Ok(false) => {
                    tracing::debug!(user_id, movie_id, "interaction exists, recommend not recorded");
                }
                Err(e) => {
                    tracing::warn!(
                        user_id,
                        movie_id,
                        error = %e,
                        "failed to save recommendation interaction"
                    );
                }
            }
        }
    }
}
