//! Request ID middleware for log and error correlation.
//!
//! Every response carries an `x-request-id` header. An upstream value is
//! reused when it looks sane; otherwise a UUID v4 is generated.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream request ID accepted verbatim.
const MAX_UPSTREAM_LEN: usize = 128;

/// Pick the request ID: a well-formed upstream value or a fresh UUID.
fn resolve_request_id(upstream: Option<&HeaderValue>) -> String {
    upstream
        .and_then(|h| h.to_str().ok())
        .filter(|id| {
            !id.is_empty()
                && id.len() <= MAX_UPSTREAM_LEN
                && id.bytes().all(|b| b.is_ascii_alphanumeric() || b"-_.:".contains(&b))
        })
        .map_or_else(|| Uuid::new_v4().to_string(), String::from)
}

/// Middleware that ensures every request has a request ID.
///
/// The ID is recorded on the current tracing span, tagged on the Sentry
/// scope, and echoed in the response headers.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = resolve_request_id(request.headers().get(REQUEST_ID_HEADER));

    Span::current().record("request_id", &request_id);

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_id_is_kept() {
        let upstream = HeaderValue::from_static("edge-1234:abc");
        assert_eq!(resolve_request_id(Some(&upstream)), "edge-1234:abc");
    }

    #[test]
    fn test_missing_id_is_generated() {
        let id = resolve_request_id(None);
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn test_odd_upstream_id_is_replaced() {
        let upstream = HeaderValue::from_static("has spaces");
        assert_ne!(resolve_request_id(Some(&upstream)), "has spaces");

        let long = HeaderValue::from_str(&"a".repeat(MAX_UPSTREAM_LEN + 1)).ok();
        let id = resolve_request_id(long.as_ref());
        assert!(Uuid::parse_str(&id).is_ok());
    }
}
