//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Account registration, login, password changes, admin account management
//! - `catalog` - Store creation and removal, store listing, the store-owner dashboard
//! - `ratings` - Rating submission, per-store ratings and summaries, admin statistics
//!
//! Services validate raw request input into core types, call the
//! repositories, and translate repository errors into their own error enums.

pub mod auth;
pub mod catalog;
pub mod ratings;

pub use auth::{AccountInput, AuthError, AuthService};
pub use catalog::{CatalogError, CatalogService, OwnerDashboard, StoreInput};
pub use ratings::{RatingError, RatingService, RatingSubmission};

/// Whether every field is non-blank.
pub(crate) fn all_present(fields: &[&str]) -> bool {
    fields.iter().all(|f| !f.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_present() {
        assert!(all_present(&["a", "b"]));
        assert!(all_present(&[]));
        assert!(!all_present(&["a", ""]));
        assert!(!all_present(&["a", "  \t"]));
    }
}
