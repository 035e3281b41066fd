use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    error::{AppError, AppResult},
    models::{Interaction, InteractionType, Movie, User},
};

use super::Store;

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Raw interactions row; the type column is free text in the schema
#[derive(sqlx::FromRow)]
struct InteractionRow {
    user_id: i64,
    movie_id: i64,
    interaction_type: String,
    rating: Option<f64>,
    timestamp: i64,
}

impl TryFrom<InteractionRow> for Interaction {
    type Error = AppError;

    fn try_from(row: InteractionRow) -> Result<Self, Self::Error> {
        let interaction_type = row
            .interaction_type
            .parse::<InteractionType>()
            .map_err(AppError::Internal)?;

        Ok(Interaction {
            user_id: row.user_id,
            movie_id: row.movie_id,
            interaction_type,
            rating: row.rating,
            timestamp: row.timestamp,
        })
    }
}

#[async_trait::async_trait]
impl Store for PgStore {
    async fn all_movies(&self) -> AppResult<Vec<Movie>> {
        let movies = sqlx::query_as::<_, Movie>(
            "SELECT id, title, genre, date FROM movies ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(movies)
    }

    async fn movie(&self, id: i64) -> AppResult<Option<Movie>> {
        let movie = sqlx::query_as::<_, Movie>(
            "SELECT id, title, genre, date FROM movies WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(movie)
    }

    async fn user(&self, id: i64) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, age, gender, is_active FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn interactions_for_user(&self, user_id: i64) -> AppResult<Vec<Interaction>> {
        let rows = sqlx::query_as::<_, InteractionRow>(
            "SELECT user_id, movie_id, interaction_type, rating, timestamp \
             FROM interactions WHERE user_id = $1 ORDER BY movie_id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Interaction::try_from).collect()
    }

    async fn interaction(&self, user_id: i64, movie_id: i64) -> AppResult<Option<Interaction>> {
        let row = sqlx::query_as::<_, InteractionRow>(
            "SELECT user_id, movie_id, interaction_type, rating, timestamp \
             FROM interactions WHERE user_id = $1 AND movie_id = $2",
        )
        .bind(user_id)
        .bind(movie_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Interaction::try_from).transpose()
    }

    async fn upsert_interaction(
        &self,
        user_id: i64,
        movie_id: i64,
        interaction_type: InteractionType,
        rating: Option<f64>,
        timestamp: i64,
    ) -> AppResult<Interaction> {
        let row = sqlx::query_as::<_, InteractionRow>(
            "INSERT INTO interactions (user_id, movie_id, interaction_type, rating, timestamp) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (user_id, movie_id) DO UPDATE SET \
                 interaction_type = EXCLUDED.interaction_type, \
                 rating = COALESCE(EXCLUDED.rating, interactions.rating), \
                 timestamp = EXCLUDED.timestamp \
             RETURNING user_id, movie_id, interaction_type, rating, timestamp",
        )
        .bind(user_id)
        .bind(movie_id)
        .bind(interaction_type.as_str())
        .bind(rating)
        .bind(timestamp)
        .fetch_one(&self.pool)
        .await?;

        Interaction::try_from(row)
    }

    async fn record_recommend_if_absent(
        &self,
        user_id: i64,
        movie_id: i64,
        timestamp: i64,
    ) -> AppResult<bool> {
        // DO NOTHING keeps the per-key existence check and insert atomic.
        let result = sqlx::query(
            "INSERT INTO interactions (user_id, movie_id, interaction_type, rating, timestamp) \
             VALUES ($1, $2, 'recommend', NULL, $3) \
             ON CONFLICT (user_id, movie_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(movie_id)
        .bind(timestamp)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
