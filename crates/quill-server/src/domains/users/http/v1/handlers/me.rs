use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};

use quill_core::api::users::UserResponse;
use quill_core::Identity;

use crate::app::AppState;
use crate::domains::users::service::get_me;

use super::map_account_error;

#[tracing::instrument(skip(state, identity))]
pub(crate) async fn me(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> impl IntoResponse {
    match get_me(&state, &identity).await {
        Ok(user) => (StatusCode::OK, Json(UserResponse::from_user(&user))).into_response(),
        Err(err) => map_account_error(err),
    }
}
