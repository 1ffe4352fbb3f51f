//! Database operations for the Storerate `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `storerate.account` - Every identity that can log in (user, store-owner, admin)
//! - `storerate.store` - Rated stores, each linked to its store-owner account
//! - `storerate.rating` - One score per (user email, store), upserted
//! - `tower_sessions.session` - Tower-sessions storage
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/`, embedded in
//! [`MIGRATOR`], and run via:
//! ```bash
//! cargo run -p storerate-cli -- migrate
//! ```

pub mod accounts;
pub mod ratings;
pub mod stores;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use accounts::AccountRepository;
pub use ratings::RatingRepository;
pub use stores::StoreRepository;

/// Embedded schema migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a unique-key violation to [`RepositoryError::Conflict`].
pub(crate) fn conflict_on_unique(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(e)
}

/// Build an `ILIKE` substring pattern, escaping the wildcard characters.
///
/// Empty or whitespace-only input means "no filter" and yields `None`.
pub(crate) fn contains_pattern(needle: Option<&str>) -> Option<String> {
    let needle = needle.map(str::trim).filter(|s| !s.is_empty())?;
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    Some(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_wraps_needle() {
        assert_eq!(contains_pattern(Some("cafe")), Some("%cafe%".to_string()));
    }

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(
            contains_pattern(Some("50%_off\\")),
            Some("%50\\%\\_off\\\\%".to_string())
        );
    }

    #[test]
    fn test_contains_pattern_blank_is_no_filter() {
        assert_eq!(contains_pattern(None), None);
        assert_eq!(contains_pattern(Some("")), None);
        assert_eq!(contains_pattern(Some("   ")), None);
    }
}
