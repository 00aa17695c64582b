use quill_core::{Role, User};
use quill_db::repo::{PermissionRepo, UserRepo};

use crate::app::AppState;
use crate::domains::errors::ServiceError;

/// Re-derives the role-dependent flags on the user, in place.
///
/// A superuser is always an Admin; the reverse edge is deliberately not
/// walked — changing the role of a superuser without clearing
/// `is_superuser` snaps the role back to Admin on the next sync.
pub fn derive_role_flags(user: &mut User) -> bool {
    let mut changed = false;
    if user.is_superuser && user.role != Role::Admin {
        user.role = Role::Admin;
        changed = true;
    }
    if user.role == Role::Admin && !user.is_superuser {
        user.is_superuser = true;
        changed = true;
    }
    let staff = user.role.is_staff_role();
    if user.is_staff != staff {
        user.is_staff = staff;
        changed = true;
    }
    changed
}

/// One explicit sync per save path: persist the derived flags, then bring
/// the user's content permissions in line with the role. Every step is
/// idempotent, so re-running a sync is harmless.
pub async fn sync_role(state: &AppState, user: &mut User) -> Result<(), ServiceError> {
    derive_role_flags(user);

    let users = UserRepo::new(&state.db);
    let rows = users
        .update_role_flags(user.id, user.role, user.is_staff, user.is_superuser)
        .await
        .map_err(|err| {
            tracing::error!(event = "role_sync_failed", error = %err, user_id = %user.id);
            ServiceError::DbError
        })?;
    if rows == 0 {
        return Err(ServiceError::NotFound);
    }

    let permissions = PermissionRepo::new(&state.db);
    if user.role.is_staff_role() {
        tracing::info!(
            event = "role_permissions_granted",
            user_id = %user.id,
            role = user.role.as_str(),
            "Adding post permissions"
        );
        for permission in state.permission_catalog.content_permissions() {
            permissions
                .grant(user.id, permission.id)
                .await
                .map_err(|err| {
                    tracing::error!(event = "role_sync_failed", error = %err, user_id = %user.id);
                    ServiceError::DbError
                })?;
        }
    } else {
        tracing::info!(
            event = "role_permissions_revoked",
            user_id = %user.id,
            role = user.role.as_str(),
            "Removing post permissions"
        );
        for permission in state.permission_catalog.content_permissions() {
            permissions
                .revoke(user.id, permission.id)
                .await
                .map_err(|err| {
                    tracing::error!(event = "role_sync_failed", error = %err, user_id = %user.id);
                    ServiceError::DbError
                })?;
        }
    }
    Ok(())
}
