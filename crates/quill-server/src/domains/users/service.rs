use std::str::FromStr;

use uuid::Uuid;

use quill_core::api::users::CreateUserRequest;
use quill_core::{Identity, Role, User};
use quill_db::repo::{PermissionRepo, UserRepo};

use crate::app::AppState;
use crate::domains::users::manager::{self, AccountError, CreateUserCommand, CreateUserOptions};
use crate::domains::users::role_sync::sync_role;

pub async fn get_me(state: &AppState, identity: &Identity) -> Result<User, AccountError> {
    let user = UserRepo::new(&state.db)
        .get_by_id(identity.user_id)
        .await
        .map_err(|err| {
            tracing::error!(event = "users_me_failed", error = %err);
            AccountError::DbError
        })?;
    user.ok_or(AccountError::NotFound)
}

/// Staff-only create through the manager path; the request may pin a role
/// and active flag, nothing else.
pub async fn admin_create_user(
    state: &AppState,
    identity: &Identity,
    request: CreateUserRequest,
) -> Result<User, AccountError> {
    if !identity.is_staff {
        return Err(AccountError::Forbidden("staff_required"));
    }
    let role = match request.role.as_deref() {
        Some(raw) => {
            Some(Role::from_str(raw).map_err(|_| AccountError::BadRequest("invalid_role"))?)
        }
        None => None,
    };
    let command = CreateUserCommand {
        first_name: request.first_name,
        last_name: request.last_name,
        email: request.email,
        user_name: request.user_name,
        password: Some(request.password),
    };
    let options = CreateUserOptions {
        role,
        is_active: request.is_active,
        ..CreateUserOptions::default()
    };
    manager::create_user(state, command, options).await
}

/// Staff-only role change. The sync re-derives the flags, so handing a
/// superuser a lower role snaps back to Admin rather than demoting.
pub async fn update_role(
    state: &AppState,
    identity: &Identity,
    user_id: Uuid,
    role_raw: &str,
) -> Result<User, AccountError> {
    if !identity.is_staff {
        return Err(AccountError::Forbidden("staff_required"));
    }
    let role = Role::from_str(role_raw).map_err(|_| AccountError::BadRequest("invalid_role"))?;

    let user = UserRepo::new(&state.db)
        .get_by_id(user_id)
        .await
        .map_err(|err| {
            tracing::error!(event = "users_role_update_failed", error = %err);
            AccountError::DbError
        })?;
    let Some(mut user) = user else {
        return Err(AccountError::NotFound);
    };

    user.role = role;
    sync_role(state, &mut user).await?;

    tracing::info!(
        event = "users_role_updated",
        user_id = %user.id,
        role = user.role.as_str(),
        updated_by = %identity.user_id,
        "Role updated"
    );
    Ok(user)
}

/// Callers may read their own grants; anyone else's require staff.
pub async fn permissions_for(
    state: &AppState,
    identity: &Identity,
    user_id: Uuid,
) -> Result<Vec<String>, AccountError> {
    if user_id != identity.user_id && !identity.is_staff {
        return Err(AccountError::Forbidden("staff_required"));
    }
    let exists = UserRepo::new(&state.db)
        .get_by_id(user_id)
        .await
        .map_err(|err| {
            tracing::error!(event = "users_permissions_failed", error = %err);
            AccountError::DbError
        })?;
    if exists.is_none() {
        return Err(AccountError::NotFound);
    }
    PermissionRepo::new(&state.db)
        .codenames_for_user(user_id)
        .await
        .map_err(|err| {
            tracing::error!(event = "users_permissions_failed", error = %err);
            AccountError::DbError
        })
}
