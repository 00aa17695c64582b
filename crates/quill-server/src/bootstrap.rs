use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::app::{self, AppState};
use crate::domains::users::catalog::{self, PermissionCatalog};
use crate::runtime;
use crate::settings;
use quill_db::{connect_sqlite_with_max, SqlitePool};

pub fn log_startup(settings: &settings::Settings) {
    tracing::info!(
        event = "server_startup",
        addr = %settings.addr,
        registration = ?settings.config.auth.registration,
        server_name = ?settings.config.server.name,
        "Server configuration loaded"
    );
}

pub async fn connect_db(settings: &settings::Settings) -> Result<SqlitePool, sqlx_core::Error> {
    connect_sqlite_with_max(&settings.db_url, settings.db_pool_max).await
}

/// Resolves the content-permission catalog before any request is served.
/// A catalog hole is a deployment error, not something to discover on the
/// first user save.
pub async fn load_permission_catalog(
    db: &SqlitePool,
) -> Result<PermissionCatalog, catalog::CatalogError> {
    let catalog = catalog::PermissionCatalog::load(db).await?;
    tracing::info!(event = "permission_catalog_loaded", "Permission catalog resolved");
    Ok(catalog)
}

pub fn build_state(
    settings: &settings::Settings,
    db: SqlitePool,
    permission_catalog: PermissionCatalog,
) -> AppState {
    AppState {
        db,
        started_at: Instant::now(),
        token_secret: settings.token_secret.clone(),
        access_token_ttl_seconds: settings.access_token_ttl_seconds,
        refresh_token_ttl_seconds: settings.refresh_token_ttl_seconds,
        config: settings.config.clone(),
        permission_catalog: Arc::new(permission_catalog),
    }
}

pub fn build_app(state: AppState) -> Router {
    let request_id_header = axum::http::HeaderName::from_static("x-request-id");
    app::build_router(state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("unknown");
                let matched = request
                    .extensions()
                    .get::<axum::extract::MatchedPath>()
                    .map(axum::extract::MatchedPath::as_str)
                    .unwrap_or("unmatched");
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %matched,
                    request_id = %request_id,
                    user_id = tracing::field::Empty
                )
            }),
        )
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(CatchPanicLayer::custom(|err| {
            tracing::error!(event = "panic_recovered", error = ?err, "handler panicked");
            match axum::response::Response::builder()
                .status(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
                .body(axum::body::Body::empty())
            {
                Ok(response) => response,
                Err(err) => {
                    tracing::error!(event = "panic_response_failed", error = %err);
                    axum::response::Response::new(axum::body::Body::empty())
                }
            }
        }))
}

pub async fn serve(settings: &settings::Settings, app: Router) {
    let addr: SocketAddr = settings.addr;
    tracing::info!(%addr, "listening");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(event = "server_bind_failed", error = %err);
            return;
        }
    };
    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(runtime::shutdown_signal())
        .await
    {
        tracing::error!(event = "server_failed", error = %err);
    }
}
