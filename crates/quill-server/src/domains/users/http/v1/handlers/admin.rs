use axum::extract::{Path, State};
use axum::{http::StatusCode, response::IntoResponse, Extension, Json};
use uuid::Uuid;

use quill_core::api::users::{
    CreateUserRequest, PermissionListResponse, UpdateRoleRequest, UserResponse,
};
use quill_core::Identity;

use crate::app::AppState;
use crate::domains::users::service;

use super::map_account_error;

#[tracing::instrument(skip(state, identity, payload))]
pub(crate) async fn create_user(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<CreateUserRequest>,
) -> impl IntoResponse {
    match service::admin_create_user(&state, &identity, payload).await {
        Ok(user) => (StatusCode::CREATED, Json(UserResponse::from_user(&user))).into_response(),
        Err(err) => map_account_error(err),
    }
}

#[tracing::instrument(skip(state, identity, payload))]
pub(crate) async fn update_role(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRoleRequest>,
) -> impl IntoResponse {
    match service::update_role(&state, &identity, id, &payload.role).await {
        Ok(user) => (StatusCode::OK, Json(UserResponse::from_user(&user))).into_response(),
        Err(err) => map_account_error(err),
    }
}

#[tracing::instrument(skip(state, identity))]
pub(crate) async fn permissions(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match service::permissions_for(&state, &identity, id).await {
        Ok(codenames) => {
            (StatusCode::OK, Json(PermissionListResponse { codenames })).into_response()
        }
        Err(err) => map_account_error(err),
    }
}
