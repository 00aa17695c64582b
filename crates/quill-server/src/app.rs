use std::sync::Arc;
use std::time::Instant;

use axum::{extract::DefaultBodyLimit, Extension, Router};

use crate::config::ServerConfig;
use crate::domains::users::catalog::PermissionCatalog;
use quill_db::SqlitePool;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub started_at: Instant,
    pub token_secret: String,
    pub access_token_ttl_seconds: i64,
    pub refresh_token_ttl_seconds: i64,
    pub config: ServerConfig,
    pub permission_catalog: Arc<PermissionCatalog>,
}

pub fn build_router(state: AppState) -> Router {
    let extension_state = state.clone();
    let max_body_bytes = state.config.server.max_body_bytes;
    crate::http::routes::router()
        .with_state(state)
        .layer(Extension(extension_state))
        .layer(DefaultBodyLimit::max(max_body_bytes))
}
