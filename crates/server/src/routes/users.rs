//! Admin account management handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use storerate_core::{AccountId, Role};

use super::MessageResponse;
use crate::error::{ApiJson, ApiPath, ApiQuery, AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{Account, AccountFilter};
use crate::services::{AccountInput, AuthService};
use crate::state::AppState;

/// Admin "add user" request body. The role is always `user`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub address: String,
}

/// Query filters for `GET /users`.
#[derive(Debug, Default, Deserialize)]
pub struct UserListQuery {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub role: Option<String>,
}

impl TryFrom<UserListQuery> for AccountFilter {
    type Error = AppError;

    fn try_from(query: UserListQuery) -> std::result::Result<Self, Self::Error> {
        let role = query
            .role
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::parse::<Role>)
            .transpose()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        Ok(Self {
            name: query.name,
            email: query.email,
            address: query.address,
            role,
        })
    }
}

/// One row of the admin user table.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: AccountId,
    pub name: String,
    pub email: String,
    pub address: String,
    pub role: Role,
}

impl From<Account> for UserResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            name: account.name,
            email: account.email.into_inner(),
            address: account.address,
            role: account.role,
        }
    }
}

/// `POST /users`
pub async fn add_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ApiJson(body): ApiJson<AddUserRequest>,
) -> Result<Json<MessageResponse>> {
    AuthService::new(state.pool())
        .add_user(AccountInput {
            name: &body.name,
            email: &body.email,
            password: &body.password,
            address: &body.address,
        })
        .await?;

    Ok(MessageResponse::json("User added successfully!"))
}

/// `GET /users`
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ApiQuery(query): ApiQuery<UserListQuery>,
) -> Result<Json<Vec<UserResponse>>> {
    let filter = AccountFilter::try_from(query)?;
    let accounts = AuthService::new(state.pool()).list(&filter).await?;

    Ok(Json(accounts.into_iter().map(UserResponse::from).collect()))
}

/// `DELETE /users/{id}`
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<MessageResponse>> {
    AuthService::new(state.pool())
        .delete(AccountId::new(id))
        .await?;

    Ok(MessageResponse::json("User deleted successfully"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_filter_parses() {
        let filter = AccountFilter::try_from(UserListQuery {
            role: Some("store-owner".to_string()),
            ..UserListQuery::default()
        })
        .unwrap();
        assert_eq!(filter.role, Some(Role::StoreOwner));
    }

    #[test]
    fn test_blank_role_is_no_filter() {
        let filter = AccountFilter::try_from(UserListQuery {
            role: Some(" ".to_string()),
            ..UserListQuery::default()
        })
        .unwrap();
        assert_eq!(filter.role, None);
    }

    #[test]
    fn test_unknown_role_is_bad_request() {
        let err = AccountFilter::try_from(UserListQuery {
            role: Some("owner".to_string()),
            ..UserListQuery::default()
        })
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
