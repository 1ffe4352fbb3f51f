//! Integration test harness for Storerate.
//!
//! Drives the full router in-process with `tower::ServiceExt::oneshot` and an
//! in-memory session store, so no server or network is needed.
//!
//! # Running Tests
//!
//! ```bash
//! # Router tests (no database needed)
//! cargo test -p storerate-integration-tests
//!
//! # Database-backed tests as well
//! DATABASE_URL=postgres://localhost/storerate_test \
//!     cargo test -p storerate-integration-tests -- --include-ignored
//! ```
//!
//! # Test Categories
//!
//! - `access_gate` - Authentication and role checks, input validation
//! - `database` - Repositories and end-to-end flows against `PostgreSQL`

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use secrecy::SecretString;
use serde_json::Value;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use tower_sessions::{MemoryStore, Session};

use storerate_core::{AccountId, Email, Role};
use storerate_server::config::{LogFormat, ServerConfig};
use storerate_server::middleware::session::SESSION_COOKIE_NAME;
use storerate_server::models::{CurrentAccount, session_keys};
use storerate_server::state::AppState;

/// A password that satisfies the account policy.
pub const GOOD_PASSWORD: &str = "Pw1!aaaa";

/// Response captured from the router.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Parsed JSON body, or `Value::String` for non-JSON bodies.
    pub body: Value,
}

impl TestResponse {
    /// The `message` field of a JSON body.
    #[must_use]
    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or_default()
    }

    /// Session cookie set by this response, as a `name=value` pair.
    #[must_use]
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| v.split(';').next())
            .find(|pair| pair.starts_with(&format!("{SESSION_COOKIE_NAME}=")))
            .map(str::to_owned)
    }
}

/// Test configuration pointing at `database_url`.
#[must_use]
pub fn test_config(database_url: &str) -> ServerConfig {
    ServerConfig {
        database_url: SecretString::from(database_url.to_owned()),
        host: [127, 0, 0, 1].into(),
        port: 0,
        base_url: "http://localhost:5000".to_owned(),
        cors_origin: "http://localhost:3000".to_owned(),
        log_format: LogFormat::Text,
        trust_proxy_headers: false,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// A pool that never connects successfully.
///
/// For tests that must be rejected before any query runs.
///
/// # Panics
///
/// Panics if the hard-coded URL does not parse.
#[must_use]
pub fn unreachable_pool() -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(500))
        .connect_lazy("postgres://storerate@127.0.0.1:1/unreachable")
        .expect("static database URL parses")
}

/// The router under test plus its session store.
pub struct TestApp {
    router: Router,
    sessions: MemoryStore,
}

impl TestApp {
    /// Build the full application over `pool` with in-memory sessions.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        let sessions = MemoryStore::default();
        let state = AppState::new(test_config("postgres://unused"), pool);
        Self {
            router: storerate_server::app(state, sessions.clone()),
            sessions,
        }
    }

    /// App whose database is unreachable.
    #[must_use]
    pub fn without_database() -> Self {
        Self::new(unreachable_pool())
    }

    /// Create a session for a synthetic account and return its cookie.
    ///
    /// # Panics
    ///
    /// Panics if the in-memory session store fails.
    pub async fn session_for(&self, role: Role, email: &str) -> String {
        let account = CurrentAccount {
            id: AccountId::new(1),
            email: Email::parse(email).expect("test email is valid"),
            name: format!("Test {role}"),
            role,
        };

        let session = Session::new(None, Arc::new(self.sessions.clone()), None);
        session
            .insert(session_keys::CURRENT_ACCOUNT, &account)
            .await
            .expect("insert into memory session");
        session.save().await.expect("save memory session");
        let id = session.id().expect("saved session has an id");

        format!("{SESSION_COOKIE_NAME}={id}")
    }

    /// Send a request through the router.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        cookie: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");

        self.send(request).await
    }

    /// Send a prebuilt request through the router.
    ///
    /// # Panics
    ///
    /// Panics if the body cannot be read.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// `GET` with an optional session cookie.
    pub async fn get(&self, path: &str, cookie: Option<&str>) -> TestResponse {
        self.request(Method::GET, path, None, cookie).await
    }

    /// `POST` a JSON body with an optional session cookie.
    pub async fn post(&self, path: &str, body: Value, cookie: Option<&str>) -> TestResponse {
        self.request(Method::POST, path, Some(body), cookie).await
    }

    /// `PUT` a JSON body with an optional session cookie.
    pub async fn put(&self, path: &str, body: Value, cookie: Option<&str>) -> TestResponse {
        self.request(Method::PUT, path, Some(body), cookie).await
    }

    /// `DELETE` with an optional session cookie.
    pub async fn delete(&self, path: &str, cookie: Option<&str>) -> TestResponse {
        self.request(Method::DELETE, path, None, cookie).await
    }
}
