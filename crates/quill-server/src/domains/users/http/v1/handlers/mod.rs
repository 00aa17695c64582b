mod admin;
mod me;

use axum::{http::StatusCode, response::IntoResponse, Json};

use crate::domains::users::manager::AccountError;

use super::types::ErrorResponse;

pub(crate) use admin::{create_user, permissions, update_role};
pub(crate) use me::me;

pub(super) fn map_account_error(error: AccountError) -> axum::response::Response {
    match error {
        AccountError::Forbidden(code) => {
            (StatusCode::FORBIDDEN, Json(ErrorResponse { error: code })).into_response()
        }
        AccountError::Unauthorized(code) => {
            (StatusCode::UNAUTHORIZED, Json(ErrorResponse { error: code })).into_response()
        }
        AccountError::BadRequest(code) => {
            (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: code })).into_response()
        }
        AccountError::Conflict(code) => {
            (StatusCode::CONFLICT, Json(ErrorResponse { error: code })).into_response()
        }
        AccountError::NotFound => StatusCode::NOT_FOUND.into_response(),
        AccountError::InvalidCredentials => (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: "invalid_credentials",
            }),
        )
            .into_response(),
        AccountError::DbError => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse { error: "db_error" }),
        )
            .into_response(),
        AccountError::Kdf => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse { error: "kdf_error" }),
        )
            .into_response(),
        AccountError::Internal(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "internal_error",
            }),
        )
            .into_response(),
    }
}
