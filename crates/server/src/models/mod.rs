//! Domain models for the rating platform.
//!
//! These types represent validated domain objects separate from database row
//! types and from the JSON shapes the routes return.

pub mod account;
pub mod rating;
pub mod session;
pub mod store;

pub use account::{Account, AccountFilter};
pub use rating::{
    DashboardStats, RatedStore, Rating, RatingAggregate, RatingFilter, RatingSummary,
    RatingWithStore,
};
pub use session::{CurrentAccount, keys as session_keys};
pub use store::{Store, StoreFilter};
