//! Router tests that never reach the database.
//!
//! Every request here is answered by middleware, extractors, or input
//! validation before a query runs, so the app is built over an unreachable
//! pool. Sessions that pass a role check still have their account looked
//! up, which fails closed here; those flows live in `database.rs`.

#![allow(clippy::unwrap_used)]

use axum::http::{Method, StatusCode, header};
use serde_json::json;

use storerate_core::Role;
use storerate_integration_tests::{GOOD_PASSWORD, TestApp};

// =============================================================================
// Health and middleware
// =============================================================================

#[tokio::test]
async fn test_health_is_ok() {
    let app = TestApp::without_database();
    let res = app.get("/health", None).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, "ok");
}

#[tokio::test]
async fn test_readiness_reports_unreachable_database() {
    let app = TestApp::without_database();
    let res = app.get("/health/ready", None).await;

    assert_eq!(res.status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_unknown_path_is_json_404() {
    let app = TestApp::without_database();
    let res = app.get("/nowhere", None).await;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.message(), "Not found");
}

#[tokio::test]
async fn test_wrong_method_is_json_405() {
    let app = TestApp::without_database();

    for (method, path) in [
        (Method::PATCH, "/users"),
        (Method::GET, "/login"),
        (Method::PUT, "/stores/1"),
    ] {
        let res = app.request(method.clone(), path, None, None).await;
        assert_eq!(res.status, StatusCode::METHOD_NOT_ALLOWED, "{method} {path}");
        assert_eq!(res.message(), "Method not allowed", "{method} {path}");
    }
}

#[tokio::test]
async fn test_every_response_carries_request_id() {
    let app = TestApp::without_database();
    let res = app.get("/me", None).await;

    let id = res.headers.get("x-request-id").unwrap().to_str().unwrap();
    assert!(!id.is_empty());
}

#[tokio::test]
async fn test_security_headers_on_api_responses() {
    let app = TestApp::without_database();
    let res = app.get("/health", None).await;

    assert_eq!(res.headers["x-frame-options"], "DENY");
    assert_eq!(res.headers["x-content-type-options"], "nosniff");
    assert_eq!(res.headers[header::CACHE_CONTROL], "no-store");
}

#[tokio::test]
async fn test_cors_allows_dashboard_origin_with_credentials() {
    let app = TestApp::without_database();
    let request = axum::http::Request::builder()
        .method(Method::OPTIONS)
        .uri("/stores")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .body(axum::body::Body::empty())
        .unwrap();
    let res = app.send(request).await;

    assert_eq!(
        res.headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:3000"
    );
    assert_eq!(res.headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
}

// =============================================================================
// Authentication gate
// =============================================================================

#[tokio::test]
async fn test_protected_routes_require_a_session() {
    let app = TestApp::without_database();

    for path in [
        "/me",
        "/users",
        "/stores",
        "/owner/store",
        "/ratings",
        "/ratings/1",
        "/ratings/1/summary",
        "/dashboard/stats",
    ] {
        let res = app.get(path, None).await;
        assert_eq!(res.status, StatusCode::UNAUTHORIZED, "GET {path}");
        assert_eq!(res.message(), "Authentication required", "GET {path}");
    }

    let res = app.post("/ratings", json!({"store_id": 1, "score": 5}), None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_session_cookie_is_unauthenticated() {
    let app = TestApp::without_database();
    let res = app
        .get("/me", Some("sr_session=not-a-real-session-id"))
        .await;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_session_account_check_fails_closed() {
    let app = TestApp::without_database();
    let cookie = app.session_for(Role::StoreOwner, "owner@shop.com").await;

    let res = app.get("/me", Some(&cookie)).await;

    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.message(), "Server error");
}

#[tokio::test]
async fn test_logout_ends_the_session() {
    let app = TestApp::without_database();
    let cookie = app.session_for(Role::User, "a@x.com").await;

    let res = app.post("/logout", json!({}), Some(&cookie)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.message(), "Logged out");

    let res = app.get("/me", Some(&cookie)).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Role gate
// =============================================================================

#[tokio::test]
async fn test_admin_routes_reject_other_roles() {
    let app = TestApp::without_database();

    for role in [Role::User, Role::StoreOwner] {
        let cookie = app.session_for(role, "someone@x.com").await;
        for path in ["/users", "/ratings", "/dashboard/stats"] {
            let res = app.get(path, Some(&cookie)).await;
            assert_eq!(res.status, StatusCode::FORBIDDEN, "{role} GET {path}");
            assert_eq!(res.message(), "Access denied");
        }

        let res = app.delete("/stores/1", Some(&cookie)).await;
        assert_eq!(res.status, StatusCode::FORBIDDEN, "{role} DELETE /stores/1");
    }
}

#[tokio::test]
async fn test_only_users_submit_ratings() {
    let app = TestApp::without_database();

    for role in [Role::StoreOwner, Role::Admin] {
        let cookie = app.session_for(role, "someone@x.com").await;
        let res = app
            .post("/ratings", json!({"store_id": 1, "score": 4}), Some(&cookie))
            .await;
        assert_eq!(res.status, StatusCode::FORBIDDEN, "{role} POST /ratings");
    }
}

#[tokio::test]
async fn test_owner_dashboard_is_store_owner_only() {
    let app = TestApp::without_database();

    for role in [Role::User, Role::Admin] {
        let cookie = app.session_for(role, "someone@x.com").await;
        let res = app.get("/owner/store", Some(&cookie)).await;
        assert_eq!(res.status, StatusCode::FORBIDDEN, "{role} GET /owner/store");
    }
}

// =============================================================================
// Input validation
// =============================================================================

#[tokio::test]
async fn test_login_requires_both_fields() {
    let app = TestApp::without_database();

    let res = app.post("/login", json!({"email": "a@x.com"}), None).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.message(), "Email and password required");

    let res = app
        .post("/login", json!({"email": "  ", "password": GOOD_PASSWORD}), None)
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_requires_all_fields() {
    let app = TestApp::without_database();
    let res = app
        .post(
            "/register",
            json!({"name": "A", "email": "a@x.com", "password": GOOD_PASSWORD, "role": "user"}),
            None,
        )
        .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.message(), "All fields are required");
}

#[tokio::test]
async fn test_register_rejects_weak_password_and_bad_email() {
    let app = TestApp::without_database();
    let base = json!({"name": "A", "address": "1 Main St", "role": "user"});

    let mut weak = base.clone();
    weak["email"] = json!("a@x.com");
    weak["password"] = json!("password1!");
    let res = app.post("/register", weak, None).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let mut bad_email = base;
    bad_email["email"] = json!("not-an-email");
    bad_email["password"] = json!(GOOD_PASSWORD);
    let res = app.post("/register", bad_email, None).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_admin_needs_admin_session() {
    let app = TestApp::without_database();
    let body = json!({
        "name": "Root",
        "email": "root@x.com",
        "password": GOOD_PASSWORD,
        "address": "HQ",
        "role": "admin",
    });

    let res = app.post("/register", body, None).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_register_rejects_unknown_role() {
    let app = TestApp::without_database();
    let res = app
        .post(
            "/register",
            json!({
                "name": "A",
                "email": "a@x.com",
                "password": GOOD_PASSWORD,
                "address": "1 Main St",
                "role": "superuser",
            }),
            None,
        )
        .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_json_is_a_json_bad_request() {
    let app = TestApp::without_database();
    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let res = app.send(request).await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(!res.message().is_empty());
}

// =============================================================================
// Rate limiting
// =============================================================================

#[tokio::test]
async fn test_credential_routes_are_rate_limited() {
    let app = TestApp::without_database();

    for _ in 0..5 {
        let res = app.post("/login", json!({}), None).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
    }

    let res = app.post("/login", json!({}), None).await;
    assert_eq!(res.status, StatusCode::TOO_MANY_REQUESTS);
    assert!(res.body.is_object());
    assert!(!res.message().is_empty());

    // Other routes are unaffected
    let res = app.get("/health", None).await;
    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn test_forwarded_for_does_not_reset_the_limit() {
    let app = TestApp::without_database();

    for hop in 1..=6 {
        let request = axum::http::Request::builder()
            .method(Method::POST)
            .uri("/login")
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-forwarded-for", format!("203.0.113.{hop}"))
            .body(axum::body::Body::from("{}"))
            .unwrap();
        let res = app.send(request).await;

        let expected = if hop <= 5 {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::TOO_MANY_REQUESTS
        };
        assert_eq!(res.status, expected, "request {hop}");
    }
}
