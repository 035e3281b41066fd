use std::collections::{BTreeMap, HashMap};

use tokio::sync::Mutex;

use crate::{
    error::AppResult,
    models::{Interaction, InteractionType, Movie, User},
};

use super::Store;

/// In-memory store for tests and local runs
///
/// One mutex over the whole state keeps every interaction write atomic per
/// key without per-row locking.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    movies: BTreeMap<i64, Movie>,
    users: HashMap<i64, User>,
    interactions: HashMap<(i64, i64), Interaction>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_movie(&self, movie: Movie) {
        self.inner.lock().await.movies.insert(movie.id, movie);
    }

    pub async fn insert_user(&self, user: User) {
        self.inner.lock().await.users.insert(user.id, user);
    }
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    async fn all_movies(&self) -> AppResult<Vec<Movie>> {
        Ok(self.inner.lock().await.movies.values().cloned().collect())
    }

    async fn movie(&self, id: i64) -> AppResult<Option<Movie>> {
        Ok(self.inner.lock().await.movies.get(&id).cloned())
    }

    async fn user(&self, id: i64) -> AppResult<Option<User>> {
        Ok(self.inner.lock().await.users.get(&id).cloned())
    }

    async fn interactions_for_user(&self, user_id: i64) -> AppResult<Vec<Interaction>> {
        let inner = self.inner.lock().await;
        let mut interactions: Vec<Interaction> = inner
            .interactions
            .values()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect();
        interactions.sort_by_key(|i| i.movie_id);
        Ok(interactions)
    }

    async fn interaction(&self, user_id: i64, movie_id: i64) -> AppResult<Option<Interaction>> {
        Ok(self
            .inner
            .lock()
            .await
            .interactions
            .get(&(user_id, movie_id))
            .cloned())
    }

    async fn upsert_interaction(
        &self,
        user_id: i64,
        movie_id: i64,
        interaction_type: InteractionType,
        rating: Option<f64>,
        timestamp: i64,
    ) -> AppResult<Interaction> {
        let mut inner = self.inner.lock().await;
        let entry = inner
            .interactions
            .entry((user_id, movie_id))
            .and_modify(|existing| {
                existing.interaction_type = interaction_type;
                if rating.is_some() {
                    existing.rating = rating;
                }
                existing.timestamp = timestamp;
            })
            .or_insert(Interaction {
                user_id,
                movie_id,
                interaction_type,
                rating,
                timestamp,
            });
        Ok(entry.clone())
    }

    async fn record_recommend_if_absent(
        &self,
        user_id: i64,
        movie_id: i64,
        timestamp: i64,
    ) -> AppResult<bool> {
        let mut inner = self.inner.lock().await;
        if inner.interactions.contains_key(&(user_id, movie_id)) {
            return Ok(false);
        }
        inner.interactions.insert(
            (user_id, movie_id),
            Interaction {
                user_id,
                movie_id,
                interaction_type: InteractionType::Recommend,
                rating: None,
                timestamp,
            },
        );
        Ok(true)
    }
}
