//! Access gate: authentication extractors and role checks.
//!
//! Identity comes from the `CurrentAccount` stored in the session at login.
//! Handlers declare what they need by extractor type. Every extractor also
//! confirms the account still exists with the same role, so deleting an
//! account ends its open sessions on their next request.

use axum::{
    Json,
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;
use sqlx::PgPool;
use tower_sessions::Session;

use storerate_core::Role;

use crate::db::AccountRepository;
use crate::models::{CurrentAccount, session_keys};
use crate::state::AppState;

/// Error returned when a request fails the access gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    /// No authenticated session, or its account is gone.
    Unauthorized,
    /// Authenticated with a role that may not perform the operation.
    Forbidden,
    /// The account could not be checked against the database.
    Unavailable,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "Authentication required"),
            Self::Forbidden => (StatusCode::FORBIDDEN, "Access denied"),
            Self::Unavailable => (StatusCode::INTERNAL_SERVER_ERROR, "Server error"),
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}

/// Check that `account` holds one of `allowed`.
///
/// # Errors
///
/// Returns `AuthRejection::Forbidden` when the role is not allowed.
pub fn authorize(account: &CurrentAccount, allowed: &[Role]) -> Result<(), AuthRejection> {
    if allowed.contains(&account.role) {
        Ok(())
    } else {
        Err(AuthRejection::Forbidden)
    }
}

async fn session_account(parts: &Parts) -> Option<(Session, CurrentAccount)> {
    let session = parts.extensions.get::<Session>()?.clone();
    let account = session
        .get::<CurrentAccount>(session_keys::CURRENT_ACCOUNT)
        .await
        .ok()
        .flatten()?;
    Some((session, account))
}

/// Confirm the session's account still exists with the role it logged in with.
///
/// A stale session is flushed and rejected as unauthenticated.
async fn ensure_current(
    pool: &PgPool,
    session: &Session,
    account: &CurrentAccount,
) -> Result<(), AuthRejection> {
    match AccountRepository::new(pool).role_of(account.id).await {
        Ok(Some(role)) if role == account.role => Ok(()),
        Ok(_) => {
            tracing::info!(
                account_id = %account.id,
                "Session account no longer exists, ending session"
            );
            if let Err(e) = session.flush().await {
                tracing::warn!(error = %e, "Failed to flush stale session");
            }
            Err(AuthRejection::Unauthorized)
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                account_id = %account.id,
                "Failed to check session account"
            );
            Err(AuthRejection::Unavailable)
        }
    }
}

/// Extractor that requires any authenticated account.
///
/// # Example
///
/// ```rust,ignore
/// async fn me(RequireAuth(account): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", account.name)
/// }
/// ```
pub struct RequireAuth(pub CurrentAccount);

impl<S> FromRequestParts<S> for RequireAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let (session, account) = session_account(parts)
            .await
            .ok_or(AuthRejection::Unauthorized)?;
        ensure_current(AppState::from_ref(state).pool(), &session, &account).await?;
        Ok(Self(account))
    }
}

/// Extractor that optionally gets the current account.
///
/// A missing or stale session yields `None`; only a failed database check
/// rejects the request.
pub struct OptionalAuth(pub Option<CurrentAccount>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some((session, account)) = session_account(parts).await else {
            return Ok(Self(None));
        };
        match ensure_current(AppState::from_ref(state).pool(), &session, &account).await {
            Ok(()) => Ok(Self(Some(account))),
            Err(AuthRejection::Unauthorized) => Ok(Self(None)),
            Err(e) => Err(e),
        }
    }
}

/// Define an extractor that admits exactly one role.
///
/// The role is checked before the database, so a wrong-role session is
/// refused without a query.
macro_rules! require_role {
    ($(#[$meta:meta])* $name:ident => $role:expr) => {
        $(#[$meta])*
        pub struct $name(pub CurrentAccount);

        impl<S> FromRequestParts<S> for $name
        where
            AppState: FromRef<S>,
            S: Send + Sync,
        {
            type Rejection = AuthRejection;

            async fn from_request_parts(
                parts: &mut Parts,
                state: &S,
            ) -> Result<Self, Self::Rejection> {
                let (session, account) = session_account(parts)
                    .await
                    .ok_or(AuthRejection::Unauthorized)?;
                authorize(&account, &[$role])?;
                ensure_current(AppState::from_ref(state).pool(), &session, &account).await?;
                Ok(Self(account))
            }
        }
    };
}

require_role!(
    /// Extractor that requires an `admin` session.
    RequireAdmin => Role::Admin
);
require_role!(
    /// Extractor that requires a `store-owner` session.
    RequireStoreOwner => Role::StoreOwner
);
require_role!(
    /// Extractor that requires a `user` session.
    RequireUser => Role::User
);

/// Store the logged-in account in the session.
///
/// Cycles the session ID first so a pre-login ID cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_account(
    session: &Session,
    account: &CurrentAccount,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session
        .insert(session_keys::CURRENT_ACCOUNT, account)
        .await
}

/// End the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_account(
    session: &Session,
) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use storerate_core::{AccountId, Email};

    use super::*;

    fn account(role: Role) -> CurrentAccount {
        CurrentAccount {
            id: AccountId::new(1),
            email: Email::parse("a@x.com").unwrap(),
            name: "Alice".to_string(),
            role,
        }
    }

    #[test]
    fn test_authorize_matching_role() {
        assert!(authorize(&account(Role::Admin), &[Role::Admin]).is_ok());
        assert!(authorize(&account(Role::User), &[Role::User, Role::StoreOwner]).is_ok());
    }

    #[test]
    fn test_authorize_rejects_other_roles() {
        for role in [Role::User, Role::StoreOwner] {
            assert_eq!(
                authorize(&account(role), &[Role::Admin]),
                Err(AuthRejection::Forbidden)
            );
        }
        assert_eq!(
            authorize(&account(Role::Admin), &[Role::User]),
            Err(AuthRejection::Forbidden)
        );
    }

    #[test]
    fn test_rejection_status_codes() {
        assert_eq!(
            AuthRejection::Unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthRejection::Forbidden.into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AuthRejection::Unavailable.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
