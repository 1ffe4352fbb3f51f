//! Security headers for a JSON-only API.
//!
//! Nothing here is ever rendered as a document, so the policy is fully
//! locked down.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};

/// Headers set on every response, overriding any a handler set.
const SECURITY_HEADERS: [(&str, &str); 6] = [
    ("x-frame-options", "DENY"),
    ("x-content-type-options", "nosniff"),
    ("referrer-policy", "no-referrer"),
    (
        "content-security-policy",
        "default-src 'none'; frame-ancestors 'none'",
    ),
    // Account and rating data must not be cached
    ("cache-control", "no-store"),
    // The dashboard reads responses from a sibling origin via CORS
    ("cross-origin-resource-policy", "same-site"),
];

/// Apply [`SECURITY_HEADERS`] to the response.
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    for (name, value) in SECURITY_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
    response
}
