//! Rating service.
//!
//! One score per (user, store); a second submission overwrites the first.

mod error;

pub use error::RatingError;

use sqlx::PgPool;

use storerate_core::{Score, StoreId};

use crate::db::{RatingRepository, RepositoryError, StoreRepository};
use crate::models::{
    CurrentAccount, DashboardStats, Rating, RatingAggregate, RatingFilter, RatingSummary,
    RatingWithStore,
};

/// Raw rating fields as submitted by a client.
#[derive(Debug, Clone, Copy, Default)]
pub struct RatingSubmission<'a> {
    /// Optional; when present it must be the caller's email.
    pub user_email: Option<&'a str>,
    pub store_id: Option<i32>,
    pub score: Option<i64>,
}

impl RatingSubmission<'_> {
    /// Check the submission against the caller and parse the score.
    fn validate(self, caller: &CurrentAccount) -> Result<(StoreId, Score), RatingError> {
        let (Some(store_id), Some(score)) = (self.store_id, self.score) else {
            return Err(RatingError::MissingFields);
        };

        if let Some(email) = self.user_email.map(str::trim).filter(|e| !e.is_empty())
            && email != caller.email.as_str()
        {
            return Err(RatingError::EmailMismatch);
        }

        Ok((StoreId::new(store_id), Score::new(score)?))
    }
}

/// Rating service.
pub struct RatingService<'a> {
    ratings: RatingRepository<'a>,
    stores: StoreRepository<'a>,
}

impl<'a> RatingService<'a> {
    /// Create a new rating service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            ratings: RatingRepository::new(pool),
            stores: StoreRepository::new(pool),
        }
    }

    /// Record the caller's score for a store and return the new aggregate.
    ///
    /// # Errors
    ///
    /// Returns `RatingError::MissingFields` if `store_id` or `score` is absent.
    /// Returns `RatingError::InvalidScore` if the score is outside 1-5.
    /// Returns `RatingError::EmailMismatch` if `user_email` is someone else's.
    /// Returns `RatingError::StoreNotFound` if the store doesn't exist.
    /// Returns `RatingError::RaterGone` if the caller's account no longer exists.
    pub async fn submit(
        &self,
        caller: &CurrentAccount,
        submission: RatingSubmission<'_>,
    ) -> Result<RatingAggregate, RatingError> {
        let (store_id, score) = submission.validate(caller)?;

        let aggregate = self
            .ratings
            .upsert(&caller.email, store_id, score)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => RatingError::StoreNotFound,
                RepositoryError::Conflict(_) => RatingError::RaterGone,
                other => RatingError::Repository(other),
            })?;

        tracing::info!(
            store_id = %store_id,
            score = %score,
            ratings_count = aggregate.count,
            "Rating submitted"
        );
        Ok(aggregate)
    }

    /// Ratings of one store, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RatingError::StoreNotFound` if the store doesn't exist.
    pub async fn for_store(&self, store_id: StoreId) -> Result<Vec<Rating>, RatingError> {
        self.ensure_store(store_id).await?;
        Ok(self.ratings.list_for_store(store_id).await?)
    }

    /// Aggregate and star distribution of one store.
    ///
    /// # Errors
    ///
    /// Returns `RatingError::StoreNotFound` if the store doesn't exist.
    pub async fn summary(&self, store_id: StoreId) -> Result<RatingSummary, RatingError> {
        self.ensure_store(store_id).await?;
        Ok(self.ratings.summary(store_id).await?)
    }

    /// Every rating on the platform, filtered.
    ///
    /// # Errors
    ///
    /// Returns `RatingError::Repository` if the database operation fails.
    pub async fn list_all(
        &self,
        filter: &RatingFilter,
    ) -> Result<Vec<RatingWithStore>, RatingError> {
        Ok(self.ratings.list_all(filter).await?)
    }

    /// Totals for the admin dashboard.
    ///
    /// # Errors
    ///
    /// Returns `RatingError::Repository` if the database operation fails.
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, RatingError> {
        Ok(self.ratings.dashboard_stats().await?)
    }

    async fn ensure_store(&self, store_id: StoreId) -> Result<(), RatingError> {
        self.stores
            .get_by_id(store_id)
            .await?
            .map(|_| ())
            .ok_or(RatingError::StoreNotFound)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use storerate_core::{AccountId, Email, Role};

    use super::*;

    fn caller() -> CurrentAccount {
        CurrentAccount {
            id: AccountId::new(1),
            email: Email::parse("a@x.com").unwrap(),
            name: "Alice".to_string(),
            role: Role::User,
        }
    }

    fn submission(user_email: Option<&str>, score: Option<i64>) -> RatingSubmission<'_> {
        RatingSubmission {
            user_email,
            store_id: Some(1),
            score,
        }
    }

    #[test]
    fn test_valid_submission() {
        let (store_id, score) = submission(Some("a@x.com"), Some(5))
            .validate(&caller())
            .unwrap();
        assert_eq!(store_id, StoreId::new(1));
        assert_eq!(score.get(), 5);
    }

    #[test]
    fn test_user_email_defaults_to_caller() {
        assert!(submission(None, Some(3)).validate(&caller()).is_ok());
        assert!(submission(Some(""), Some(3)).validate(&caller()).is_ok());
    }

    #[test]
    fn test_other_users_email_is_rejected() {
        assert!(matches!(
            submission(Some("b@x.com"), Some(3)).validate(&caller()),
            Err(RatingError::EmailMismatch)
        ));
    }

    #[test]
    fn test_missing_fields() {
        assert!(matches!(
            submission(None, None).validate(&caller()),
            Err(RatingError::MissingFields)
        ));
        let no_store = RatingSubmission {
            score: Some(4),
            ..RatingSubmission::default()
        };
        assert!(matches!(
            no_store.validate(&caller()),
            Err(RatingError::MissingFields)
        ));
    }

    #[test]
    fn test_out_of_range_score() {
        for bad in [0, 6, -3] {
            assert!(matches!(
                submission(None, Some(bad)).validate(&caller()),
                Err(RatingError::InvalidScore(_))
            ));
        }
    }
}
