use std::str::FromStr;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use crate::app::AppState;
use crate::domains::auth::core::tokens::{decode_token, TOKEN_TYPE_ACCESS};
use quill_core::Identity;
use quill_db::repo::UserRepo;

pub async fn auth_middleware(
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let state = request
        .extensions()
        .get::<AppState>()
        .cloned()
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok());

    let token = match auth_header {
        Some(value) if value.starts_with("Bearer ") => &value[7..],
        _ => return Err(StatusCode::UNAUTHORIZED),
    };

    let claims = match decode_token(&state.token_secret, token, TOKEN_TYPE_ACCESS) {
        Ok(claims) => claims,
        Err(reason) => {
            tracing::warn!(event = "auth_failed", reason, "Access token rejected");
            return Err(StatusCode::UNAUTHORIZED);
        }
    };
    let user_id = Uuid::from_str(&claims.sub).map_err(|_| StatusCode::UNAUTHORIZED)?;

    // The token proves who the caller was at issue time; role and active
    // status are re-read so revocations take effect within one request.
    let user = UserRepo::new(&state.db)
        .get_by_id(user_id)
        .await
        .map_err(|err| {
            tracing::error!(event = "auth_lookup_failed", error = %err);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
    let Some(user) = user else {
        return Err(StatusCode::UNAUTHORIZED);
    };
    if !user.is_active {
        tracing::warn!(event = "auth_failed", reason = "user_inactive", user_id = %user.id);
        return Err(StatusCode::UNAUTHORIZED);
    }

    let identity = Identity::from_user(&user);
    tracing::Span::current().record("user_id", identity.user_id.to_string());
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}
