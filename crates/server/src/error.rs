//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding. All route handlers return `Result<T, AppError>`, and
//! every error body is `{"message": "..."}`.

use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::{AuthError, CatalogError, RatingError};

/// Message returned for every 5xx response.
const SERVER_ERROR_MESSAGE: &str = "Server error";

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Account or authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Store catalog operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Rating operation failed.
    #[error("Rating error: {0}")]
    Rating(#[from] RatingError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => match err {
                AuthError::MissingFields
                | AuthError::MissingCredentials
                | AuthError::InvalidEmail(_)
                | AuthError::WeakPassword(_)
                | AuthError::InvalidRole(_)
                | AuthError::EmailTaken
                | AuthError::InvalidCredentials
                | AuthError::WrongOldPassword => StatusCode::BAD_REQUEST,
                AuthError::AdminRequired | AuthError::NotOwnAccount => StatusCode::FORBIDDEN,
                AuthError::AccountNotFound => StatusCode::NOT_FOUND,
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Catalog(err) => match err {
                CatalogError::MissingFields
                | CatalogError::InvalidEmail(_)
                | CatalogError::WeakPassword(_)
                | CatalogError::StoreEmailTaken => StatusCode::BAD_REQUEST,
                CatalogError::StoreNotFound | CatalogError::NoStoreForOwner => {
                    StatusCode::NOT_FOUND
                }
                CatalogError::Repository(_) | CatalogError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Rating(err) => match err {
                RatingError::MissingFields | RatingError::InvalidScore(_) => {
                    StatusCode::BAD_REQUEST
                }
                RatingError::EmailMismatch => StatusCode::FORBIDDEN,
                RatingError::RaterGone => StatusCode::UNAUTHORIZED,
                RatingError::StoreNotFound => StatusCode::NOT_FOUND,
                RatingError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Client-facing message. Server errors never expose details.
    #[must_use]
    pub fn message(&self) -> String {
        if self.status().is_server_error() {
            return SERVER_ERROR_MESSAGE.to_string();
        }
        match self {
            Self::Auth(err) => err.to_string(),
            Self::Catalog(err) => err.to_string(),
            Self::Rating(err) => err.to_string(),
            Self::NotFound(msg) | Self::BadRequest(msg) => msg.clone(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        (status, Json(json!({ "message": self.message() }))).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// JSON body extractor whose rejections use the `{"message"}` error shape.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Query string extractor with `{"message"}` rejections.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// Path parameter extractor with `{"message"}` rejections.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context.
///
/// Call this after successful authentication to associate errors with accounts.
pub fn set_sentry_user(account_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(account_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the account.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;
    use storerate_core::{PasswordError, Score};

    use super::*;

    async fn body_message(err: AppError) -> (StatusCode, String) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        (status, json["message"].as_str().unwrap().to_string())
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("store 12".to_string());
        assert_eq!(err.to_string(), "Not found: store 12");
    }

    #[tokio::test]
    async fn test_duplicate_email_is_400() {
        assert_eq!(
            body_message(AuthError::EmailTaken.into()).await,
            (StatusCode::BAD_REQUEST, "Email already exists".to_string())
        );
        assert_eq!(
            body_message(CatalogError::StoreEmailTaken.into()).await,
            (
                StatusCode::BAD_REQUEST,
                "Store email already exists".to_string()
            )
        );
    }

    #[tokio::test]
    async fn test_credential_errors() {
        assert_eq!(
            body_message(AuthError::InvalidCredentials.into()).await,
            (StatusCode::BAD_REQUEST, "Invalid credentials".to_string())
        );
        assert_eq!(
            body_message(AuthError::WrongOldPassword.into()).await,
            (
                StatusCode::BAD_REQUEST,
                "Old password is incorrect".to_string()
            )
        );
        assert_eq!(
            body_message(AuthError::AccountNotFound.into()).await,
            (StatusCode::NOT_FOUND, "User not found".to_string())
        );
    }

    #[tokio::test]
    async fn test_validation_errors_are_400() {
        assert_eq!(
            body_message(AuthError::MissingFields.into()).await,
            (StatusCode::BAD_REQUEST, "All fields are required".to_string())
        );
        let (status, _) = body_message(AuthError::WeakPassword(PasswordError::Length).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let score_err = Score::new(9).unwrap_err();
        let (status, message) = body_message(RatingError::InvalidScore(score_err).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(message.contains("between 1 and 5"));
    }

    #[tokio::test]
    async fn test_server_errors_hide_details() {
        let err = AppError::Database(RepositoryError::DataCorruption(
            "secret internals".to_string(),
        ));
        assert_eq!(
            body_message(err).await,
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server error".to_string()
            )
        );

        let err = AppError::Auth(AuthError::Repository(RepositoryError::NotFound));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Server error");
    }

    #[test]
    fn test_forbidden_variants() {
        assert_eq!(
            AppError::from(AuthError::AdminRequired).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::from(RatingError::EmailMismatch).status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_deleted_rater_is_unauthorized() {
        let err = AppError::from(RatingError::RaterGone);
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.message(), "Authentication required");
    }
}
