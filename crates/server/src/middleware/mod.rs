//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (added by the binary)
//! 2. CORS (dashboard origin, credentials allowed)
//! 3. `TraceLayer` (request span with a `request_id` field)
//! 4. Request ID (record in span, Sentry scope, response header)
//! 5. Security headers
//! 6. Session layer (tower-sessions)
//! 7. Rate limiting (governor, credential routes only)

pub mod auth;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{
    AuthRejection, OptionalAuth, RequireAdmin, RequireAuth, RequireStoreOwner, RequireUser,
    authorize, clear_current_account, set_current_account,
};
pub use rate_limit::auth_rate_limiter;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
