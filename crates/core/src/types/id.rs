//! Typed integer IDs.
//!
//! Accounts and stores both use `SERIAL` keys; wrapping them keeps an
//! account ID from being passed where a store ID is expected.

/// Define an `i32`-backed ID newtype.
///
/// The generated type is `Copy`, serializes as a bare integer, converts to
/// and from `i32`, and (with the `postgres` feature) binds as `INTEGER`.
///
/// ```rust
/// # use storerate_core::define_id;
/// define_id!(ReviewerId);
/// define_id!(ShelfId);
///
/// let reviewer = ReviewerId::new(1);
/// assert_eq!(reviewer.as_i32(), 1);
/// // let _: ShelfId = reviewer; // does not compile
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[cfg_attr(feature = "postgres", derive(::sqlx::Type), sqlx(transparent))]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn as_i32(self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl ::core::convert::From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl ::core::convert::From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(AccountId);
define_id!(StoreId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        let id = StoreId::new(42);
        assert_eq!(id.as_i32(), 42);
        assert_eq!(i32::from(id), 42);
        assert_eq!(StoreId::from(42), id);
        assert_eq!(AccountId::new(7).to_string(), "7");
    }

    #[test]
    fn test_serializes_as_integer() {
        let json = serde_json::to_string(&StoreId::new(3)).unwrap_or_default();
        assert_eq!(json, "3");
    }
}
