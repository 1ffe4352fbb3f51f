//! Shared handler state.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ServerConfig;

/// State handed to every handler via `State<AppState>`.
///
/// `PgPool` is already reference-counted; only the config needs an `Arc`.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ServerConfig>,
    pool: PgPool,
}

impl AppState {
    #[must_use]
    pub fn new(config: ServerConfig, pool: PgPool) -> Self {
        Self {
            config: Arc::new(config),
            pool,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Pool handed to the services (`AuthService::new(state.pool())`, ...).
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}
