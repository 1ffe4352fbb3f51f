//! Authentication route handlers.
//!
//! Registration, login/logout, the current profile, and password changes.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use storerate_core::Role;

use super::MessageResponse;
use crate::error::{ApiJson, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{OptionalAuth, RequireAuth, clear_current_account, set_current_account};
use crate::models::CurrentAccount;
use crate::services::{AccountInput, AuthService};
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// Registration request body.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub address: String,
    pub role: String,
}

/// Login request body.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Password change request body.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub email: String,
    pub old_password: String,
    pub new_password: String,
}

// =============================================================================
// Response Types
// =============================================================================

/// Minimal profile returned on login and by `/me`.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub email: String,
    pub role: Role,
    pub name: String,
}

impl From<&CurrentAccount> for ProfileResponse {
    fn from(account: &CurrentAccount) -> Self {
        Self {
            email: account.email.to_string(),
            role: account.role,
            name: account.name.clone(),
        }
    }
}

/// Login response body.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub user: ProfileResponse,
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /register`
pub async fn register(
    State(state): State<AppState>,
    OptionalAuth(caller): OptionalAuth,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<Json<MessageResponse>> {
    AuthService::new(state.pool())
        .register(
            AccountInput {
                name: &body.name,
                email: &body.email,
                password: &body.password,
                address: &body.address,
            },
            &body.role,
            caller.as_ref(),
        )
        .await?;

    Ok(MessageResponse::json("Registered successfully!"))
}

/// `POST /login`
///
/// On success the session ID is cycled and the account stored in it.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let account = AuthService::new(state.pool())
        .login(&body.email, &body.password)
        .await
        .inspect_err(|e| tracing::warn!(error = %e, "Login failed"))?;

    let current = CurrentAccount::from(&account);
    set_current_account(&session, &current).await?;
    set_sentry_user(&current.id, Some(current.email.as_str()));
    tracing::info!(account_id = %current.id, role = %current.role, "Login succeeded");

    Ok(Json(LoginResponse {
        message: "Login successful!",
        user: ProfileResponse::from(&current),
    }))
}

/// `POST /logout`
pub async fn logout(session: Session) -> Result<Json<MessageResponse>> {
    clear_current_account(&session).await?;
    clear_sentry_user();
    Ok(MessageResponse::json("Logged out"))
}

/// `GET /me`
pub async fn me(RequireAuth(account): RequireAuth) -> Json<ProfileResponse> {
    Json(ProfileResponse::from(&account))
}

/// `PUT /change-password`
///
/// Cycles the session ID after the change.
pub async fn change_password(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(account): RequireAuth,
    ApiJson(body): ApiJson<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>> {
    AuthService::new(state.pool())
        .change_password(
            &account,
            &body.email,
            &body.old_password,
            &body.new_password,
        )
        .await?;

    session.cycle_id().await?;

    Ok(MessageResponse::json("Password changed successfully!"))
}
