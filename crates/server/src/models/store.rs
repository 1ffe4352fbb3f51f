//! Store domain types.

use chrono::{DateTime, Utc};

use storerate_core::{AccountId, Email, StoreId};

/// A rated store (domain type).
///
/// The store's login credential lives on its owner account.
#[derive(Debug, Clone)]
pub struct Store {
    /// Unique store ID.
    pub id: StoreId,
    /// Store name.
    pub name: String,
    /// What the store sells or does.
    pub purpose: String,
    /// Postal address.
    pub address: String,
    /// Contact email, identical to the owner account's email.
    pub email: Email,
    /// The store-owner account created alongside the store.
    pub owner_id: AccountId,
    /// When the store was created.
    pub created_at: DateTime<Utc>,
}

/// Optional filters for listing stores.
#[derive(Debug, Clone, Default)]
pub struct StoreFilter {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub purpose: Option<String>,
    /// Free-text search over name OR address.
    pub q: Option<String>,
}
