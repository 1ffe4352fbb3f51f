//! Account repository for database operations.
//!
//! Accounts hold every login identity. The password hash is only read back
//! by [`AccountRepository::get_with_password_hash`].

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use storerate_core::{AccountId, Email, Role};

use super::{RepositoryError, conflict_on_unique, contains_pattern};
use crate::models::{Account, AccountFilter};

/// Columns selected for every [`AccountRow`].
const ACCOUNT_COLUMNS: &str = "id, name, email, address, role::text AS role, created_at";

/// Database row for an account.
#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: i32,
    name: String,
    email: String,
    address: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = RepositoryError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let role = row.role.parse::<Role>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid role in database: {e}"))
        })?;

        Ok(Self {
            id: AccountId::new(row.id),
            name: row.name,
            email,
            address: row.address,
            role,
            created_at: row.created_at,
        })
    }
}

/// Account row joined with its password hash.
#[derive(Debug, sqlx::FromRow)]
struct CredentialRow {
    #[sqlx(flatten)]
    account: AccountRow,
    password_hash: String,
}

/// Fields for a new account. The password is already hashed.
#[derive(Debug, Clone, Copy)]
pub struct NewAccount<'a> {
    pub name: &'a str,
    pub email: &'a Email,
    pub password_hash: &'a str,
    pub address: &'a str,
    pub role: Role,
}

/// Insert an account on an existing connection or transaction.
///
/// Shared by [`AccountRepository::create`] and store creation, which
/// inserts the owner account inside its own transaction.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the email already exists.
/// Returns `RepositoryError::Database` for other database errors.
pub(crate) async fn insert_account(
    conn: &mut PgConnection,
    new: NewAccount<'_>,
) -> Result<Account, RepositoryError> {
    let row = sqlx::query_as::<_, AccountRow>(&format!(
        r"
        INSERT INTO storerate.account (name, email, password_hash, address, role)
        VALUES ($1, $2, $3, $4, $5::storerate.account_role)
        RETURNING {ACCOUNT_COLUMNS}
        "
    ))
    .bind(new.name)
    .bind(new.email)
    .bind(new.password_hash)
    .bind(new.address)
    .bind(new.role.as_str())
    .fetch_one(conn)
    .await
    .map_err(|e| conflict_on_unique(e, "email"))?;

    row.try_into()
}

/// Repository for account database operations.
pub struct AccountRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AccountRepository<'a> {
    /// Create a new account repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new: NewAccount<'_>) -> Result<Account, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        insert_account(&mut conn, new).await
    }

    /// Get an account together with its password hash.
    ///
    /// Returns `None` if no account has this email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(Account, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, CredentialRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS}, password_hash FROM storerate.account WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some((row.account.try_into()?, row.password_hash)))
    }

    /// Current role of an account, or `None` if it no longer exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if the stored role is unknown.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn role_of(&self, id: AccountId) -> Result<Option<Role>, RepositoryError> {
        let role: Option<String> =
            sqlx::query_scalar("SELECT role::text FROM storerate.account WHERE id = $1")
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        role.map(|r| {
            r.parse::<Role>().map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid role in database: {e}"))
            })
        })
        .transpose()
    }

    /// Replace an account's password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no account has this email.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update_password_hash(
        &self,
        email: &Email,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE storerate.account
            SET password_hash = $2, updated_at = NOW()
            WHERE email = $1
            ",
        )
        .bind(email)
        .bind(password_hash)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// List accounts matching the filter, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: &AccountFilter) -> Result<Vec<Account>, RepositoryError> {
        let rows = sqlx::query_as::<_, AccountRow>(&format!(
            r"
            SELECT {ACCOUNT_COLUMNS}
            FROM storerate.account
            WHERE ($1::text IS NULL OR name ILIKE $1)
              AND ($2::text IS NULL OR email ILIKE $2)
              AND ($3::text IS NULL OR address ILIKE $3)
              AND ($4::text IS NULL OR role::text = $4)
            ORDER BY id
            "
        ))
        .bind(contains_pattern(filter.name.as_deref()))
        .bind(contains_pattern(filter.email.as_deref()))
        .bind(contains_pattern(filter.address.as_deref()))
        .bind(filter.role.map(Role::as_str))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Account::try_from).collect()
    }

    /// Delete an account by ID.
    ///
    /// Ratings by the account, and the store it owns, go with it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account doesn't exist.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: AccountId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM storerate.account WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
