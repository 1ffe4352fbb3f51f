//! Authentication error types.

use thiserror::Error;

use storerate_core::{EmailError, PasswordError, RoleParseError};

use crate::db::RepositoryError;

/// Errors that can occur during account and authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A required field is empty.
    #[error("All fields are required")]
    MissingFields,

    /// Login without email or password.
    #[error("Email and password required")]
    MissingCredentials,

    /// Invalid email format.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Password breaks the policy.
    #[error("Invalid password: {0}")]
    WeakPassword(#[from] PasswordError),

    /// Unknown role name.
    #[error("Invalid role: {0}")]
    InvalidRole(#[from] RoleParseError),

    /// Only an admin may create another admin.
    #[error("Only an admin can register an admin account")]
    AdminRequired,

    /// Email is already used by an account.
    #[error("Email already exists")]
    EmailTaken,

    /// Invalid credentials (wrong password or unknown email).
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Account not found.
    #[error("User not found")]
    AccountNotFound,

    /// Old password did not verify during a password change.
    #[error("Old password is incorrect")]
    WrongOldPassword,

    /// Caller tried to change another account's password.
    #[error("You can only change your own password")]
    NotOwnAccount,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
