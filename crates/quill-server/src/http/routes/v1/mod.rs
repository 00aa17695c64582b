use crate::app::AppState;
use axum::{middleware, Router};

pub fn router() -> Router<AppState> {
    // Protected API requires auth middleware.
    let protected = Router::new()
        .merge(crate::domains::users::http::v1::router())
        .layer(middleware::from_fn(
            crate::domains::auth::core::auth_middleware,
        ));

    // Public routes do their own auth or are unauthenticated.
    Router::new()
        .merge(crate::domains::auth::http::v1::router())
        .merge(protected)
}
