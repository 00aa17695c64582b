use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use quill_core::api::auth::{LoginRequest, RefreshRequest, RegisterRequest};

use crate::app::AppState;
use crate::domains::auth::service::{self, AuthError};

use super::super::types::ErrorResponse;

fn map_auth_error(error: AuthError) -> axum::response::Response {
    match error {
        AuthError::Forbidden(code) => {
            (StatusCode::FORBIDDEN, Json(ErrorResponse { error: code })).into_response()
        }
        AuthError::Unauthorized(code) => {
            (StatusCode::UNAUTHORIZED, Json(ErrorResponse { error: code })).into_response()
        }
        AuthError::BadRequest(code) => {
            (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: code })).into_response()
        }
        AuthError::Conflict(code) => {
            (StatusCode::CONFLICT, Json(ErrorResponse { error: code })).into_response()
        }
        AuthError::NotFound => StatusCode::NOT_FOUND.into_response(),
        AuthError::InvalidCredentials => (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: "invalid_credentials",
            }),
        )
            .into_response(),
        AuthError::DbError => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse { error: "db_error" }),
        )
            .into_response(),
        AuthError::Kdf => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse { error: "kdf_error" }),
        )
            .into_response(),
        AuthError::Internal(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "internal_error",
            }),
        )
            .into_response(),
    }
}

#[tracing::instrument(skip(state, payload))]
pub(crate) async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> impl IntoResponse {
    match service::register(&state, payload).await {
        Ok(pair) => (StatusCode::CREATED, Json(pair)).into_response(),
        Err(err) => map_auth_error(err),
    }
}

#[tracing::instrument(skip(state, payload))]
pub(crate) async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    match service::login_internal(&state, payload).await {
        Ok(pair) => (StatusCode::OK, Json(pair)).into_response(),
        Err(err) => map_auth_error(err),
    }
}

#[tracing::instrument(skip(state, payload))]
pub(crate) async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> impl IntoResponse {
    match service::refresh(&state, payload).await {
        Ok(pair) => (StatusCode::OK, Json(pair)).into_response(),
        Err(err) => map_auth_error(err),
    }
}
