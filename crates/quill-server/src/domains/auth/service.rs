use std::str::FromStr;

use chrono::Utc;
use uuid::Uuid;

use quill_core::api::auth::{LoginRequest, RefreshRequest, RegisterRequest, TokenPairResponse};
use quill_db::repo::UserRepo;

use crate::app::AppState;
use crate::config::Registration;
use crate::domains::auth::core::passwords::verify_password;
use crate::domains::auth::core::tokens::{decode_token, issue_pair, TOKEN_TYPE_REFRESH};
use crate::domains::errors::ServiceError;
use crate::domains::users::manager::{self, normalize_email, CreateUserCommand, CreateUserOptions};

pub type AuthError = ServiceError;

/// Issues a fresh refresh/access pair for the user.
pub fn tokens_for_user(state: &AppState, user_id: Uuid) -> Result<TokenPairResponse, AuthError> {
    issue_pair(
        &state.token_secret,
        user_id,
        state.access_token_ttl_seconds,
        state.refresh_token_ttl_seconds,
    )
    .map_err(|reason| {
        tracing::error!(event = "token_issue_failed", reason);
        AuthError::Internal("token_issue_failed")
    })
}

pub async fn register(
    state: &AppState,
    payload: RegisterRequest,
) -> Result<TokenPairResponse, AuthError> {
    if state.config.auth.registration == Registration::Disabled {
        return Err(AuthError::Forbidden("registration_disabled"));
    }

    let command = CreateUserCommand {
        first_name: payload.first_name,
        last_name: payload.last_name,
        email: payload.email,
        user_name: payload.user_name,
        password: Some(payload.password),
    };
    let user = manager::create_user(state, command, CreateUserOptions::default()).await?;

    tracing::info!(event = "auth_registered", user_id = %user.id, "User registered");
    tokens_for_user(state, user.id)
}

pub async fn login_internal(
    state: &AppState,
    payload: LoginRequest,
) -> Result<TokenPairResponse, AuthError> {
    let repo = UserRepo::new(&state.db);
    let email = normalize_email(&payload.email);
    let user = repo.get_by_email(&email).await.map_err(|err| {
        tracing::error!(event = "auth_login_failed", error = %err);
        AuthError::DbError
    })?;
    let Some(user) = user else {
        tracing::warn!(event = "auth_login_rejected", reason = "unknown_email");
        return Err(AuthError::InvalidCredentials);
    };

    let Some(stored) = user.password_hash.as_deref() else {
        tracing::warn!(event = "auth_login_rejected", reason = "no_password", user_id = %user.id);
        return Err(AuthError::InvalidCredentials);
    };
    match verify_password(&payload.password, stored) {
        Ok(true) => {}
        Ok(false) => {
            tracing::warn!(
                event = "auth_login_rejected",
                reason = "bad_password",
                user_id = %user.id
            );
            return Err(AuthError::InvalidCredentials);
        }
        Err(reason) => {
            tracing::error!(event = "auth_login_failed", reason, user_id = %user.id);
            return Err(AuthError::Kdf);
        }
    }
    if !user.is_active {
        tracing::warn!(event = "auth_login_rejected", reason = "inactive", user_id = %user.id);
        return Err(AuthError::InvalidCredentials);
    }

    if let Err(err) = repo.update_last_login(user.id, Utc::now()).await {
        // Login still succeeds; the timestamp is advisory.
        tracing::warn!(event = "auth_last_login_update_failed", error = %err, user_id = %user.id);
    }

    tracing::info!(event = "auth_login", user_id = %user.id, "User logged in");
    tokens_for_user(state, user.id)
}

pub async fn refresh(
    state: &AppState,
    payload: RefreshRequest,
) -> Result<TokenPairResponse, AuthError> {
    let claims = decode_token(&state.token_secret, &payload.refresh_token, TOKEN_TYPE_REFRESH)
        .map_err(|reason| {
            tracing::warn!(event = "auth_refresh_rejected", reason);
            AuthError::Unauthorized("invalid_refresh_token")
        })?;
    let user_id = Uuid::from_str(&claims.sub)
        .map_err(|_| AuthError::Unauthorized("invalid_refresh_token"))?;

    let user = UserRepo::new(&state.db)
        .get_by_id(user_id)
        .await
        .map_err(|err| {
            tracing::error!(event = "auth_refresh_failed", error = %err);
            AuthError::DbError
        })?;
    let Some(user) = user else {
        return Err(AuthError::Unauthorized("invalid_refresh_token"));
    };
    if !user.is_active {
        tracing::warn!(event = "auth_refresh_rejected", reason = "inactive", user_id = %user.id);
        return Err(AuthError::Unauthorized("invalid_refresh_token"));
    }

    tokens_for_user(state, user.id)
}
