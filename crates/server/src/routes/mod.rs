//! HTTP route handlers and the application router.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                     - Liveness check
//! GET    /health/ready               - Readiness check (database)
//!
//! # Auth (login/register are rate limited)
//! POST   /register                   - Register (admin role needs an admin session)
//! POST   /login                      - Password login, sets the session cookie
//! POST   /logout                     - End the session
//! GET    /me                         - Current profile
//! PUT    /change-password            - Change own password
//!
//! # Accounts (admin)
//! POST   /users                      - Add a user account
//! GET    /users                      - List accounts (filters: name, email, address, role)
//! DELETE /users/{id}                 - Delete an account
//!
//! # Stores
//! POST   /stores                     - Add a store and its owner account (admin)
//! GET    /stores                     - List stores with aggregates (any account)
//! DELETE /stores/{id}                - Delete a store (admin)
//! GET    /owner/store                - Store-owner dashboard (store-owner)
//!
//! # Ratings
//! POST   /ratings                    - Submit or overwrite a rating (user)
//! GET    /ratings                    - All ratings (admin)
//! GET    /ratings/{store_id}         - Ratings of one store (any account)
//! GET    /ratings/{store_id}/summary - Aggregate and distribution (any account)
//! GET    /dashboard/stats            - Platform totals (admin)
//! ```

pub mod auth;
pub mod dashboard;
pub mod ratings;
pub mod stores;
pub mod users;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderValue, Method, StatusCode, header},
    middleware::from_fn,
    routing::{delete, get, post, put},
};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tower_sessions::SessionStore;
use tracing::Span;

use crate::error::AppError;
use crate::middleware::{
    auth_rate_limiter, create_session_layer, request_id_middleware, security_headers_middleware,
};
use crate::state::AppState;

/// `{"message": ...}` response body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    /// Wrap a message in a JSON response.
    #[must_use]
    pub const fn json(message: &'static str) -> Json<Self> {
        Json(Self { message })
    }
}

/// Credential routes, behind the auth rate limiter.
fn credential_routes(trust_proxy_headers: bool) -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .layer(auth_rate_limiter(trust_proxy_headers))
}

/// Create all API routes.
///
/// `trust_proxy_headers` selects how the credential rate limiter identifies
/// clients (see `ServerConfig::trust_proxy_headers`).
pub fn routes(trust_proxy_headers: bool) -> Router<AppState> {
    Router::new()
        .merge(credential_routes(trust_proxy_headers))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
        .route("/change-password", put(auth::change_password))
        .route("/users", get(users::list_users).post(users::add_user))
        .route("/users/{id}", delete(users::delete_user))
        .route("/stores", get(stores::list_stores).post(stores::add_store))
        .route("/stores/{id}", delete(stores::delete_store))
        .route("/owner/store", get(stores::owner_store))
        .route(
            "/ratings",
            get(ratings::list_ratings).post(ratings::submit_rating),
        )
        .route("/ratings/{store_id}", get(ratings::store_ratings))
        .route("/ratings/{store_id}/summary", get(ratings::store_summary))
        .route("/dashboard/stats", get(dashboard::stats))
}

/// Build the complete application router with its middleware stack.
///
/// Sentry layers are not included; the binary adds them outermost.
pub fn app<S>(state: AppState, session_store: S) -> Router
where
    S: SessionStore + Clone,
{
    let session_layer = create_session_layer(session_store, state.config().is_secure());
    let cors = cors_layer(&state.config().cors_origin);

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes(state.config().trust_proxy_headers))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(session_layer)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .layer(cors)
        .with_state(state)
}

/// CORS for the dashboard front end: one origin, cookies allowed.
fn cors_layer(origin: &str) -> CorsLayer {
    let allow_origin = HeaderValue::from_str(origin).map_or_else(
        |_| {
            tracing::warn!(origin, "Unusable CORS origin, cross-origin requests disabled");
            AllowOrigin::list([])
        },
        AllowOrigin::exact,
    );

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// JSON 404 for unmatched paths.
async fn not_found() -> AppError {
    AppError::NotFound("Not found".to_string())
}

async fn method_not_allowed() -> (StatusCode, Json<MessageResponse>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        MessageResponse::json("Method not allowed"),
    )
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
