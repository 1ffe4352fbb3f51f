//! Account roles.

use serde::{Deserialize, Serialize};

/// Error returned when a string is not one of the known roles.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid role: {0} (expected user, store-owner, or admin)")]
pub struct RoleParseError(pub String);

/// Role attached to every account.
///
/// Stored in the `storerate.account_role` enum using the wire names.
///
/// The set is closed. It decides which operations an authenticated session
/// may perform; see the server's access gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// Browses stores and submits ratings.
    User,
    /// Owns exactly one store and views its ratings.
    StoreOwner,
    /// Manages accounts and stores, sees every rating.
    Admin,
}

impl Role {
    /// All roles, in privilege order.
    pub const ALL: [Self; 3] = [Self::User, Self::StoreOwner, Self::Admin];

    /// Wire name of the role (`user`, `store-owner`, `admin`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::StoreOwner => "store-owner",
            Self::Admin => "admin",
        }
    }

    /// Whether an anonymous caller may self-register with this role.
    #[must_use]
    pub const fn is_self_service(self) -> bool {
        matches!(self, Self::User | Self::StoreOwner)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "store-owner" => Ok(Self::StoreOwner),
            "admin" => Ok(Self::Admin),
            _ => Err(RoleParseError(s.to_owned())),
        }
    }
}
