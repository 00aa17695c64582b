use axum::{
    routing::{get, post, put},
    Router,
};

use crate::app::AppState;

mod handlers;
pub(crate) mod types;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/users/me", get(handlers::me))
        .route("/v1/users", post(handlers::create_user))
        .route("/v1/users/:id/role", put(handlers::update_role))
        .route("/v1/users/:id/permissions", get(handlers::permissions))
}
