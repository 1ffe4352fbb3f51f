//! Store catalog error types.

use thiserror::Error;

use storerate_core::{EmailError, PasswordError};

use crate::db::RepositoryError;

/// Errors that can occur during store catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A required field is empty.
    #[error("All fields are required")]
    MissingFields,

    /// Invalid store email.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Owner password breaks the policy.
    #[error("Invalid password: {0}")]
    WeakPassword(#[from] PasswordError),

    /// The email is already used by a store or an account.
    #[error("Store email already exists")]
    StoreEmailTaken,

    /// No store with this ID.
    #[error("Store not found")]
    StoreNotFound,

    /// The store-owner has no store.
    #[error("Store not found for your account")]
    NoStoreForOwner,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
