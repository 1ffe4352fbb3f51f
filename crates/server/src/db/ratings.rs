//! Rating repository for database operations.
//!
//! Ratings are keyed by `(user_email, store_id)`. Writes are upserts and the
//! store's aggregate is read back inside the same transaction.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use storerate_core::{Email, Score, StoreId};

use super::{RepositoryError, contains_pattern};
use crate::models::{
    DashboardStats, Rating, RatingAggregate, RatingFilter, RatingSummary, RatingWithStore,
};

/// Foreign key from `rating.store_id` to `store.id`.
const STORE_FKEY: &str = "rating_store_id_fkey";

/// SQL computing a store's aggregate; `$1` is the store ID.
const AGGREGATE_SQL: &str = r"
    SELECT COALESCE(AVG(score)::float8, 0) AS average, COUNT(*) AS count
    FROM storerate.rating
    WHERE store_id = $1
";

/// Database row for a rating.
#[derive(Debug, sqlx::FromRow)]
struct RatingRow {
    user_email: String,
    store_id: i32,
    score: Score,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<RatingRow> for Rating {
    type Error = RepositoryError;

    fn try_from(row: RatingRow) -> Result<Self, Self::Error> {
        Ok(Self {
            user_email: parse_email(&row.user_email)?,
            store_id: StoreId::new(row.store_id),
            score: row.score,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RatingWithStoreRow {
    user_email: String,
    store_id: i32,
    store_name: String,
    score: Score,
}

impl TryFrom<RatingWithStoreRow> for RatingWithStore {
    type Error = RepositoryError;

    fn try_from(row: RatingWithStoreRow) -> Result<Self, Self::Error> {
        Ok(Self {
            user_email: parse_email(&row.user_email)?,
            store_id: StoreId::new(row.store_id),
            store_name: row.store_name,
            score: row.score,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AggregateRow {
    average: f64,
    count: i64,
}

impl From<AggregateRow> for RatingAggregate {
    fn from(row: AggregateRow) -> Self {
        Self {
            average: row.average,
            count: row.count,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct StatsRow {
    total_users: i64,
    total_stores: i64,
    total_ratings: i64,
    avg_rating: f64,
}

fn parse_email(raw: &str) -> Result<Email, RepositoryError> {
    Email::parse(raw).map_err(|e| {
        RepositoryError::DataCorruption(format!("invalid rating email in database: {e}"))
    })
}

/// Repository for rating database operations.
pub struct RatingRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RatingRepository<'a> {
    /// Create a new rating repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert or overwrite a user's score for a store, then return the
    /// store's aggregate including the write.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store doesn't exist.
    /// Returns `RepositoryError::Conflict` if the rater has no account.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn upsert(
        &self,
        user_email: &Email,
        store_id: StoreId,
        score: Score,
    ) -> Result<RatingAggregate, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r"
            INSERT INTO storerate.rating (user_email, store_id, score)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_email, store_id)
            DO UPDATE SET score = EXCLUDED.score, updated_at = NOW()
            ",
        )
        .bind(user_email)
        .bind(store_id)
        .bind(score)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                if db_err.constraint() == Some(STORE_FKEY) {
                    return RepositoryError::NotFound;
                }
                return RepositoryError::Conflict("rater has no account".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        let aggregate = sqlx::query_as::<_, AggregateRow>(AGGREGATE_SQL)
            .bind(store_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(aggregate.into())
    }

    /// All ratings for a store, in the order they were first submitted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_store(&self, store_id: StoreId) -> Result<Vec<Rating>, RepositoryError> {
        let rows = sqlx::query_as::<_, RatingRow>(
            r"
            SELECT user_email, store_id, score, created_at, updated_at
            FROM storerate.rating
            WHERE store_id = $1
            ORDER BY created_at, user_email
            ",
        )
        .bind(store_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Rating::try_from).collect()
    }

    /// A store's aggregate with its per-star distribution.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn summary(&self, store_id: StoreId) -> Result<RatingSummary, RepositoryError> {
        let buckets: Vec<(Score, i64)> = sqlx::query_as(
            r"
            SELECT score, COUNT(*)
            FROM storerate.rating
            WHERE store_id = $1
            GROUP BY score
            ",
        )
        .bind(store_id)
        .fetch_all(self.pool)
        .await?;

        Ok(RatingSummary::from_distribution(store_id, buckets))
    }

    /// Every rating with its store name, grouped by store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(
        &self,
        filter: &RatingFilter,
    ) -> Result<Vec<RatingWithStore>, RepositoryError> {
        let rows = sqlx::query_as::<_, RatingWithStoreRow>(
            r"
            SELECT r.user_email, r.store_id, s.name AS store_name, r.score
            FROM storerate.rating r
            JOIN storerate.store s ON s.id = r.store_id
            WHERE ($1::text IS NULL OR r.user_email ILIKE $1)
              AND ($2::text IS NULL OR s.name ILIKE $2)
              AND ($3::smallint IS NULL OR r.score >= $3)
              AND ($4::smallint IS NULL OR r.score <= $4)
            ORDER BY r.store_id, r.created_at, r.user_email
            ",
        )
        .bind(contains_pattern(filter.user_email.as_deref()))
        .bind(contains_pattern(filter.store_name.as_deref()))
        .bind(filter.min_score)
        .bind(filter.max_score)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(RatingWithStore::try_from).collect()
    }

    /// Platform-wide totals.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, RepositoryError> {
        let row = sqlx::query_as::<_, StatsRow>(
            r"
            SELECT
                (SELECT COUNT(*) FROM storerate.account) AS total_users,
                (SELECT COUNT(*) FROM storerate.store) AS total_stores,
                (SELECT COUNT(*) FROM storerate.rating) AS total_ratings,
                (SELECT COALESCE(AVG(score)::float8, 0) FROM storerate.rating) AS avg_rating
            ",
        )
        .fetch_one(self.pool)
        .await?;

        Ok(DashboardStats {
            total_users: row.total_users,
            total_stores: row.total_stores,
            total_ratings: row.total_ratings,
            avg_rating: row.avg_rating,
        })
    }
}
