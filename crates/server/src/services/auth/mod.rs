//! Account and authentication service.
//!
//! Handles registration, admin-created accounts, password login, password
//! changes, and the admin account listing.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use storerate_core::{AccountId, Email, Password, Role};

use super::all_present;
use crate::db::RepositoryError;
use crate::db::accounts::{AccountRepository, NewAccount};
use crate::models::{Account, AccountFilter, CurrentAccount};

/// Raw account fields as submitted by a client.
#[derive(Debug, Clone, Copy)]
pub struct AccountInput<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub address: &'a str,
}

/// Account fields after validation.
struct ValidAccount<'a> {
    name: &'a str,
    email: Email,
    password: Password,
    address: &'a str,
}

impl<'a> AccountInput<'a> {
    fn validate(self) -> Result<ValidAccount<'a>, AuthError> {
        if !all_present(&[self.name, self.email, self.password, self.address]) {
            return Err(AuthError::MissingFields);
        }
        Ok(ValidAccount {
            name: self.name.trim(),
            email: Email::parse(self.email.trim())?,
            password: Password::parse(self.password)?,
            address: self.address.trim(),
        })
    }
}

/// Account and authentication service.
pub struct AuthService<'a> {
    accounts: AccountRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            accounts: AccountRepository::new(pool),
        }
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register a new account with the requested role.
    ///
    /// Anonymous callers may register `user` and `store-owner` accounts;
    /// `admin` accounts require an admin `caller`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingFields` if any field is blank.
    /// Returns `AuthError::InvalidEmail`, `WeakPassword` or `InvalidRole` on bad input.
    /// Returns `AuthError::AdminRequired` if a non-admin requests an admin account.
    /// Returns `AuthError::EmailTaken` if the email is already registered.
    pub async fn register(
        &self,
        input: AccountInput<'_>,
        role: &str,
        caller: Option<&CurrentAccount>,
    ) -> Result<Account, AuthError> {
        if role.trim().is_empty() {
            return Err(AuthError::MissingFields);
        }
        let valid = input.validate()?;
        let role: Role = role.trim().parse()?;

        if !role.is_self_service() && caller.is_none_or(|c| c.role != Role::Admin) {
            return Err(AuthError::AdminRequired);
        }

        self.create(valid, role).await
    }

    /// Create a `user` account on behalf of an admin.
    ///
    /// # Errors
    ///
    /// Same as [`register`](Self::register), minus the role checks.
    pub async fn add_user(&self, input: AccountInput<'_>) -> Result<Account, AuthError> {
        let valid = input.validate()?;
        self.create(valid, Role::User).await
    }

    /// Create an `admin` account without a caller (CLI bootstrap).
    ///
    /// # Errors
    ///
    /// Same as [`add_user`](Self::add_user).
    pub async fn bootstrap_admin(&self, input: AccountInput<'_>) -> Result<Account, AuthError> {
        let valid = input.validate()?;
        self.create(valid, Role::Admin).await
    }

    async fn create(&self, valid: ValidAccount<'_>, role: Role) -> Result<Account, AuthError> {
        let password_hash = hash_password(&valid.password).map_err(|_| AuthError::PasswordHash)?;

        let account = self
            .accounts
            .create(NewAccount {
                name: valid.name,
                email: &valid.email,
                password_hash: &password_hash,
                address: valid.address,
                role,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(account_id = %account.id, role = %role, "Account created");
        Ok(account)
    }

    // =========================================================================
    // Credentials
    // =========================================================================

    /// Login with email and password.
    ///
    /// Unknown emails and wrong passwords both yield `InvalidCredentials`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingCredentials` if either field is blank.
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<Account, AuthError> {
        if !all_present(&[email, password]) {
            return Err(AuthError::MissingCredentials);
        }
        let email = Email::parse(email.trim()).map_err(|_| AuthError::InvalidCredentials)?;

        let (account, password_hash) = self
            .accounts
            .get_with_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash).map_err(|_| AuthError::InvalidCredentials)?;

        Ok(account)
    }

    /// Change the caller's own password after verifying the old one.
    ///
    /// The stored hash is left untouched on any failure.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingFields` if any field is blank.
    /// Returns `AuthError::NotOwnAccount` if `email` is not the caller's.
    /// Returns `AuthError::AccountNotFound` if the account no longer exists.
    /// Returns `AuthError::WrongOldPassword` if `old_password` does not verify.
    /// Returns `AuthError::WeakPassword` if `new_password` breaks the policy.
    pub async fn change_password(
        &self,
        caller: &CurrentAccount,
        email: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        if !all_present(&[email, old_password, new_password]) {
            return Err(AuthError::MissingFields);
        }
        if email.trim() != caller.email.as_str() {
            return Err(AuthError::NotOwnAccount);
        }

        let (_, current_hash) = self
            .accounts
            .get_with_password_hash(&caller.email)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        verify_password(old_password, &current_hash).map_err(|_| AuthError::WrongOldPassword)?;

        let new_password = Password::parse(new_password)?;
        let new_hash = hash_password(&new_password).map_err(|_| AuthError::PasswordHash)?;

        self.accounts
            .update_password_hash(&caller.email, &new_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AuthError::AccountNotFound,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(account_id = %caller.id, "Password changed");
        Ok(())
    }

    // =========================================================================
    // Administration
    // =========================================================================

    /// List accounts matching the filter.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the database operation fails.
    pub async fn list(&self, filter: &AccountFilter) -> Result<Vec<Account>, AuthError> {
        Ok(self.accounts.list(filter).await?)
    }

    /// Delete an account by ID.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AccountNotFound` if the account doesn't exist.
    pub async fn delete(&self, id: AccountId) -> Result<(), AuthError> {
        self.accounts.delete(id).await.map_err(|e| match e {
            RepositoryError::NotFound => AuthError::AccountNotFound,
            other => AuthError::Repository(other),
        })?;

        tracing::info!(account_id = %id, "Account deleted");
        Ok(())
    }
}

/// Hash a password using Argon2id.
pub(crate) fn hash_password(password: &Password) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.expose().as_bytes(), &salt)
        .map(|hash| hash.to_string())
}

/// Verify a password against a PHC hash string.
pub(crate) fn verify_password(
    password: &str,
    hash: &str,
) -> Result<(), argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    Argon2::default().verify_password(password.as_bytes(), &parsed_hash)
}
