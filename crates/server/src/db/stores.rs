//! Store repository for database operations.
//!
//! Every store row is paired with a `store-owner` account sharing its email.
//! Both are written and removed together in one transaction.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use storerate_core::{AccountId, Email, Role, StoreId};

use super::accounts::{NewAccount, insert_account};
use super::{RepositoryError, conflict_on_unique, contains_pattern};
use crate::models::{RatedStore, RatingAggregate, Store, StoreFilter};

const STORE_COLUMNS: &str = "s.id, s.name, s.purpose, s.address, s.email, s.owner_id, s.created_at";

/// Database row for a store.
#[derive(Debug, sqlx::FromRow)]
struct StoreRow {
    id: i32,
    name: String,
    purpose: String,
    address: String,
    email: String,
    owner_id: i32,
    created_at: DateTime<Utc>,
}

impl TryFrom<StoreRow> for Store {
    type Error = RepositoryError;

    fn try_from(row: StoreRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid store email in database: {e}"))
        })?;

        Ok(Self {
            id: StoreId::new(row.id),
            name: row.name,
            purpose: row.purpose,
            address: row.address,
            email,
            owner_id: AccountId::new(row.owner_id),
            created_at: row.created_at,
        })
    }
}

/// Store row with its rating aggregate.
#[derive(Debug, sqlx::FromRow)]
struct RatedStoreRow {
    #[sqlx(flatten)]
    store: StoreRow,
    avg_rating: f64,
    ratings_count: i64,
}

impl TryFrom<RatedStoreRow> for RatedStore {
    type Error = RepositoryError;

    fn try_from(row: RatedStoreRow) -> Result<Self, Self::Error> {
        Ok(Self {
            store: row.store.try_into()?,
            aggregate: RatingAggregate {
                average: row.avg_rating,
                count: row.ratings_count,
            },
        })
    }
}

/// Fields for a new store. The owner's password is already hashed.
#[derive(Debug, Clone, Copy)]
pub struct NewStore<'a> {
    pub name: &'a str,
    pub purpose: &'a str,
    pub address: &'a str,
    pub email: &'a Email,
    pub password_hash: &'a str,
}

/// Repository for store database operations.
pub struct StoreRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StoreRepository<'a> {
    /// Create a new store repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a store and its `store-owner` account atomically.
    ///
    /// The owner account is named after the store and shares its email and
    /// address. If either insert fails, neither row persists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if any account or store already
    /// uses the email.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_with_owner(&self, new: NewStore<'_>) -> Result<Store, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let owner = insert_account(
            &mut *tx,
            NewAccount {
                name: new.name,
                email: new.email,
                password_hash: new.password_hash,
                address: new.address,
                role: Role::StoreOwner,
            },
        )
        .await?;

        let row = sqlx::query_as::<_, StoreRow>(
            r"
            INSERT INTO storerate.store AS s (name, purpose, address, email, owner_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING s.id, s.name, s.purpose, s.address, s.email, s.owner_id, s.created_at
            ",
        )
        .bind(new.name)
        .bind(new.purpose)
        .bind(new.address)
        .bind(new.email)
        .bind(owner.id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, "store email"))?;

        tx.commit().await?;

        row.try_into()
    }

    /// Get a store by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: StoreId) -> Result<Option<Store>, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(&format!(
            "SELECT {STORE_COLUMNS} FROM storerate.store s WHERE s.id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Store::try_from).transpose()
    }

    /// Get the store owned by the account with this email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_owner_email(
        &self,
        email: &Email,
    ) -> Result<Option<Store>, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(&format!(
            r"
            SELECT {STORE_COLUMNS}
            FROM storerate.store s
            JOIN storerate.account a ON a.id = s.owner_id
            WHERE a.email = $1
            "
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        row.map(Store::try_from).transpose()
    }

    /// List stores matching the filter, each with its rating aggregate.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: &StoreFilter) -> Result<Vec<RatedStore>, RepositoryError> {
        let rows = sqlx::query_as::<_, RatedStoreRow>(&format!(
            r"
            SELECT {STORE_COLUMNS},
                   COALESCE(AVG(r.score)::float8, 0) AS avg_rating,
                   COUNT(r.score) AS ratings_count
            FROM storerate.store s
            LEFT JOIN storerate.rating r ON r.store_id = s.id
            WHERE ($1::text IS NULL OR s.name ILIKE $1)
              AND ($2::text IS NULL OR s.email ILIKE $2)
              AND ($3::text IS NULL OR s.address ILIKE $3)
              AND ($4::text IS NULL OR s.purpose ILIKE $4)
              AND ($5::text IS NULL OR s.name ILIKE $5 OR s.address ILIKE $5)
            GROUP BY s.id
            ORDER BY s.id
            "
        ))
        .bind(contains_pattern(filter.name.as_deref()))
        .bind(contains_pattern(filter.email.as_deref()))
        .bind(contains_pattern(filter.address.as_deref()))
        .bind(contains_pattern(filter.purpose.as_deref()))
        .bind(contains_pattern(filter.q.as_deref()))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(RatedStore::try_from).collect()
    }

    /// Delete a store, its ratings, and its owner account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store doesn't exist.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: StoreId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let owner_id: Option<i32> =
            sqlx::query_scalar("DELETE FROM storerate.store WHERE id = $1 RETURNING owner_id")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(owner_id) = owner_id else {
            return Err(RepositoryError::NotFound);
        };

        sqlx::query("DELETE FROM storerate.account WHERE id = $1")
            .bind(owner_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
