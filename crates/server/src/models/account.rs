//! Account domain types.

use chrono::{DateTime, Utc};

use storerate_core::{AccountId, Email, Role};

/// An account (domain type).
///
/// Never carries the password hash; repositories hand the hash out
/// separately only where a credential check needs it.
#[derive(Debug, Clone)]
pub struct Account {
    /// Unique account ID.
    pub id: AccountId,
    /// Display name.
    pub name: String,
    /// Login email, unique across accounts.
    pub email: Email,
    /// Postal address.
    pub address: String,
    /// Role deciding what the account may do.
    pub role: Role,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// Optional filters for listing accounts.
///
/// Text filters are case-insensitive substring matches; `role` is exact.
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub role: Option<Role>,
}
