//! Store catalog service.
//!
//! Creating a store also creates its `store-owner` login account; deleting a
//! store removes that account and every rating of the store.

mod error;

pub use error::CatalogError;

use sqlx::PgPool;

use storerate_core::{Email, Password, StoreId};

use super::all_present;
use super::auth::hash_password;
use crate::db::RepositoryError;
use crate::db::stores::NewStore;
use crate::db::{RatingRepository, StoreRepository};
use crate::models::{RatedStore, Rating, RatingSummary, Store, StoreFilter};

/// Raw store fields as submitted by an admin.
#[derive(Debug, Clone, Copy)]
pub struct StoreInput<'a> {
    pub name: &'a str,
    pub purpose: &'a str,
    pub address: &'a str,
    pub email: &'a str,
    /// Login password of the owner account.
    pub password: &'a str,
}

/// Everything the store-owner dashboard shows.
#[derive(Debug, Clone)]
pub struct OwnerDashboard {
    pub store: Store,
    pub summary: RatingSummary,
    pub ratings: Vec<Rating>,
}

/// Store catalog service.
pub struct CatalogService<'a> {
    stores: StoreRepository<'a>,
    ratings: RatingRepository<'a>,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            stores: StoreRepository::new(pool),
            ratings: RatingRepository::new(pool),
        }
    }

    /// Create a store together with its owner account.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::MissingFields` if any field is blank.
    /// Returns `CatalogError::InvalidEmail` or `WeakPassword` on bad input.
    /// Returns `CatalogError::StoreEmailTaken` if any store or account uses the email.
    pub async fn add_store(&self, input: StoreInput<'_>) -> Result<Store, CatalogError> {
        if !all_present(&[
            input.name,
            input.purpose,
            input.address,
            input.email,
            input.password,
        ]) {
            return Err(CatalogError::MissingFields);
        }
        let email = Email::parse(input.email.trim())?;
        let password = Password::parse(input.password)?;
        let password_hash = hash_password(&password).map_err(|_| CatalogError::PasswordHash)?;

        let store = self
            .stores
            .create_with_owner(NewStore {
                name: input.name.trim(),
                purpose: input.purpose.trim(),
                address: input.address.trim(),
                email: &email,
                password_hash: &password_hash,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => CatalogError::StoreEmailTaken,
                other => CatalogError::Repository(other),
            })?;

        tracing::info!(store_id = %store.id, owner_id = %store.owner_id, "Store created");
        Ok(store)
    }

    /// List stores with their rating aggregates.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the database operation fails.
    pub async fn list(&self, filter: &StoreFilter) -> Result<Vec<RatedStore>, CatalogError> {
        Ok(self.stores.list(filter).await?)
    }

    /// Delete a store, its owner account, and its ratings.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::StoreNotFound` if the store doesn't exist.
    pub async fn delete(&self, id: StoreId) -> Result<(), CatalogError> {
        self.stores.delete(id).await.map_err(|e| match e {
            RepositoryError::NotFound => CatalogError::StoreNotFound,
            other => CatalogError::Repository(other),
        })?;

        tracing::info!(store_id = %id, "Store deleted");
        Ok(())
    }

    /// The store owned by `owner_email`, its rating summary, and its ratings.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NoStoreForOwner` if the account owns no store.
    pub async fn owner_dashboard(
        &self,
        owner_email: &Email,
    ) -> Result<OwnerDashboard, CatalogError> {
        let store = self
            .stores
            .get_by_owner_email(owner_email)
            .await?
            .ok_or(CatalogError::NoStoreForOwner)?;

        let summary = self.ratings.summary(store.id).await?;
        let ratings = self.ratings.list_for_store(store.id).await?;

        Ok(OwnerDashboard {
            store,
            summary,
            ratings,
        })
    }
}
