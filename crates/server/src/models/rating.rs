//! Rating domain types and aggregation.

use chrono::{DateTime, Utc};

use storerate_core::{Email, Score, StoreId};

use super::Store;

/// One user's score for one store.
#[derive(Debug, Clone)]
pub struct Rating {
    pub user_email: Email,
    pub store_id: StoreId,
    pub score: Score,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A rating joined with the name of the rated store (admin view).
#[derive(Debug, Clone)]
pub struct RatingWithStore {
    pub user_email: Email,
    pub store_id: StoreId,
    pub store_name: String,
    pub score: Score,
}

/// Optional filters for the admin ratings listing.
#[derive(Debug, Clone, Default)]
pub struct RatingFilter {
    /// Substring of the rater's email.
    pub user_email: Option<String>,
    /// Substring of the store name.
    pub store_name: Option<String>,
    /// Inclusive lower bound.
    pub min_score: Option<Score>,
    /// Inclusive upper bound.
    pub max_score: Option<Score>,
}

/// Average and count of a store's ratings.
///
/// A store with no ratings has average `0.0` and count `0`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RatingAggregate {
    pub average: f64,
    pub count: i64,
}

impl RatingAggregate {
    #[allow(clippy::cast_precision_loss)]
    fn from_sum(sum: i64, count: i64) -> Self {
        if count == 0 {
            return Self::default();
        }
        Self {
            average: sum as f64 / count as f64,
            count,
        }
    }
}

/// Aggregate plus the number of ratings at each star level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingSummary {
    pub store_id: StoreId,
    pub aggregate: RatingAggregate,
    /// `distribution[0]` counts 1-star ratings, `distribution[4]` 5-star.
    pub distribution: [i64; 5],
}

impl RatingSummary {
    /// Build a summary from `(score, count)` pairs, as returned by a
    /// `GROUP BY score` query.
    #[must_use]
    pub fn from_distribution<I>(store_id: StoreId, buckets: I) -> Self
    where
        I: IntoIterator<Item = (Score, i64)>,
    {
        let mut distribution = [0_i64; 5];
        for (score, count) in buckets {
            distribution[score.bucket()] += count;
        }

        let (sum, count) = distribution
            .iter()
            .zip(1_i64..)
            .fold((0, 0), |(sum, total), (n, stars)| (sum + n * stars, total + n));

        Self {
            store_id,
            aggregate: RatingAggregate::from_sum(sum, count),
            distribution,
        }
    }
}

/// A store with its rating aggregate (store list view).
#[derive(Debug, Clone)]
pub struct RatedStore {
    pub store: Store,
    pub aggregate: RatingAggregate,
}

/// Platform-wide totals for the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashboardStats {
    /// Every account, regardless of role.
    pub total_users: i64,
    pub total_stores: i64,
    pub total_ratings: i64,
    /// Mean over all ratings; `0.0` when there are none.
    pub avg_rating: f64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn scores(values: &[i64]) -> Vec<Score> {
        values.iter().map(|v| Score::new(*v).unwrap()).collect()
    }

    /// Aggregate computed directly from raw scores.
    fn aggregate_of(values: &[i64]) -> RatingAggregate {
        let sum = scores(values).iter().map(|s| i64::from(s.get())).sum();
        RatingAggregate::from_sum(sum, i64::try_from(values.len()).unwrap())
    }

    #[test]
    fn test_mean_of_two_and_four() {
        let agg = aggregate_of(&[2, 4]);
        assert_eq!(agg.average, 3.0);
        assert_eq!(agg.count, 2);
    }

    #[test]
    fn test_empty_is_zero() {
        let agg = aggregate_of(&[]);
        assert_eq!(agg, RatingAggregate::default());
        assert_eq!(agg.average, 0.0);
    }

    #[test]
    fn test_non_integer_average() {
        let agg = aggregate_of(&[5, 4, 4]);
        assert!((agg.average - 13.0 / 3.0).abs() < 1e-9);
        assert_eq!(agg.count, 3);
    }

    #[test]
    fn test_summary_from_distribution() {
        let summary = RatingSummary::from_distribution(
            StoreId::new(7),
            [
                (Score::new(5).unwrap(), 3),
                (Score::new(1).unwrap(), 1),
            ],
        );
        assert_eq!(summary.distribution, [1, 0, 0, 0, 3]);
        assert_eq!(summary.aggregate.count, 4);
        assert_eq!(summary.aggregate.average, 4.0);
        assert_eq!(summary.store_id, StoreId::new(7));
    }

    #[test]
    fn test_summary_agrees_with_scores() {
        let raw = [3, 3, 2, 5, 1, 4, 4];
        let mut buckets = std::collections::HashMap::new();
        for s in scores(&raw) {
            *buckets.entry(s).or_insert(0_i64) += 1;
        }
        let summary = RatingSummary::from_distribution(StoreId::new(1), buckets);
        assert_eq!(summary.aggregate, aggregate_of(&raw));
    }
}
