//! Rating error types.

use thiserror::Error;

use storerate_core::ScoreError;

use crate::db::RepositoryError;

/// Errors that can occur during rating operations.
#[derive(Debug, Error)]
pub enum RatingError {
    /// `store_id` or `score` is missing.
    #[error("All fields are required")]
    MissingFields,

    /// Score outside 1-5.
    #[error("Invalid score: {0}")]
    InvalidScore(#[from] ScoreError),

    /// Submitted `user_email` is not the caller's.
    #[error("You can only submit ratings as yourself")]
    EmailMismatch,

    /// The caller's account was deleted while the session was still open.
    #[error("Authentication required")]
    RaterGone,

    /// No store with this ID.
    #[error("Store not found")]
    StoreNotFound,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
