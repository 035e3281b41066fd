use crate::{
    error::AppResult,
    models::{Interaction, InteractionType, Movie, User},
};

/// Storage collaborator consumed by the gateway and the interaction logger
///
/// The serving pipeline only needs lookups plus two flavors of interaction
/// write: the full upsert used by the explicit interactions endpoint, and the
/// insert-if-absent used by recommend logging. Both writes must be atomic per
/// (user_id, movie_id) key, so concurrent recommendation responses touching
/// the same pair cannot both insert.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    /// Every catalog movie
    async fn all_movies(&self) -> AppResult<Vec<Movie>>;

    /// Catalog lookup by id
    async fn movie(&self, id: i64) -> AppResult<Option<Movie>>;

    /// User lookup by id
    async fn user(&self, id: i64) -> AppResult<Option<User>>;

    /// All interactions recorded for one user
    async fn interactions_for_user(&self, user_id: i64) -> AppResult<Vec<Interaction>>;

    /// The interaction for one (user, movie) pair, if any
    async fn interaction(&self, user_id: i64, movie_id: i64) -> AppResult<Option<Interaction>>;

    /// Insert or fully update the record for (user_id, movie_id)
    ///
    /// The update branch overwrites the type, refreshes the timestamp, and
    /// replaces the rating when one is provided. Only this operation is
    /// allowed to overwrite an existing record's type.
    async fn upsert_interaction(
        &self,
        user_id: i64,
        movie_id: i64,
        interaction_type: InteractionType,
        rating: Option<f64>,
        timestamp: i64,
    ) -> AppResult<Interaction>;

    /// Insert a `recommend` record unless the pair already has one
    ///
    /// Existing records are left completely untouched, whatever their type —
    /// recommend logging must never downgrade a prior `rate` or `select`.
    /// Returns whether a record was inserted.
    async fn record_recommend_if_absent(
        &self,
        user_id: i64,
        movie_id: i64,
        timestamp: i64,
    ) -> AppResult<bool>;
}
