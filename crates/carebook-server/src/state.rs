//! Shared application state.

use std::path::PathBuf;
use std::time::Duration;

use axum::extract::FromRef;

use carebook_auth::AuthState;
use carebook_db_postgres::PgPool;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    /// Root directory for uploaded photos.
    pub media_dir: PathBuf,
    pub session_ttl: Duration,
}

impl AppState {
    pub fn new(pool: PgPool, cfg: &AppConfig) -> Self {
        Self {
            pool,
            media_dir: PathBuf::from(&cfg.media.dir),
            session_ttl: cfg.session_ttl(),
        }
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        AuthState::new(state.pool.clone())
    }
}
