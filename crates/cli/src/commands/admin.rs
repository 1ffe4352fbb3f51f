//! Admin account management commands.
//!
//! Admin accounts cannot be self-registered, so the first one is created
//! here. Later admins can be registered through the API by an admin.
//!
//! # Environment Variables
//!
//! - `SR_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `SR_ADMIN_PASSWORD` - Password, when `--password` is not given

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use storerate_server::services::{AccountInput, AuthError, AuthService};

use super::{DatabaseError, connect};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// Validation or persistence failure.
    #[error("{0}")]
    Auth(#[from] AuthError),
}

/// Create a new admin account.
///
/// # Returns
///
/// The ID of the created account.
///
/// # Errors
///
/// Returns `AdminError::Auth` if the input is invalid or the email is taken.
pub async fn create(
    email: &str,
    name: &str,
    address: &str,
    password: &SecretString,
) -> Result<i32, AdminError> {
    let pool = connect().await?;

    tracing::info!("Creating admin account: {}", email);

    let account = AuthService::new(&pool)
        .bootstrap_admin(AccountInput {
            name,
            email,
            password: password.expose_secret(),
            address,
        })
        .await?;

    tracing::info!(
        "Admin account created successfully! ID: {}, Email: {}",
        account.id,
        account.email
    );

    Ok(account.id.as_i32())
}
