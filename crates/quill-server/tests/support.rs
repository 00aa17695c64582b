#![allow(dead_code)]

use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use sqlx_core::pool::PoolOptions;
use sqlx_sqlite::SqliteConnectOptions;
use tower::ServiceExt;

use quill_db::{migrate, SqlitePool};
use quill_server::app::{build_router, AppState};
use quill_server::config::ServerConfig;
use quill_server::domains::users::catalog::PermissionCatalog;

pub const TEST_TOKEN_SECRET: &str = "integration-test-secret";

pub fn tune_test_kdf(config: &mut ServerConfig) {
    config.auth.kdf.iterations = 1;
    config.auth.kdf.memory_kb = 8;
    config.auth.kdf.parallelism = 1;
}

// In-memory SQLite exists per connection, so the pool holds exactly one.
pub async fn setup_db() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("parse sqlite url")
        .foreign_keys(true);
    let pool = PoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("connect test pool");
    migrate(&pool).await.expect("migrate");
    pool
}

pub struct TestApp {
    pub app: axum::Router,
    pub state: AppState,
    pub pool: SqlitePool,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    pub async fn with_config(customize: impl FnOnce(&mut ServerConfig)) -> Self {
        let pool = setup_db().await;
        let mut config = ServerConfig::default();
        tune_test_kdf(&mut config);
        customize(&mut config);

        let catalog = PermissionCatalog::load(&pool).await.expect("catalog");
        let state = AppState {
            db: pool.clone(),
            started_at: Instant::now(),
            token_secret: TEST_TOKEN_SECRET.to_string(),
            access_token_ttl_seconds: 3600,
            refresh_token_ttl_seconds: 86400,
            config,
            permission_catalog: Arc::new(catalog),
        };
        let app = build_router(state.clone());
        Self { app, state, pool }
    }

    pub async fn send_json(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: &serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(path)
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = builder
            .body(Body::from(body.to_string()))
            .expect("build request");
        self.dispatch(request).await
    }

    pub async fn send_empty(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = builder.body(Body::empty()).expect("build request");
        self.dispatch(request).await
    }

    async fn dispatch(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router oneshot");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, json)
    }
}
