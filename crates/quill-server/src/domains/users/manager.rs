use chrono::Utc;
use uuid::Uuid;

use quill_core::{Role, User};
use quill_db::repo::UserRepo;
use quill_db::is_unique_violation;

use crate::app::AppState;
use crate::domains::auth::core::passwords::hash_password;
use crate::domains::errors::ServiceError;
use crate::domains::users::role_sync::{derive_role_flags, sync_role};

pub type AccountError = ServiceError;

#[derive(Debug, Clone)]
pub struct CreateUserCommand {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub user_name: String,
    pub password: Option<String>,
}

/// Everything beyond the required fields is named here; there is no
/// open-ended field passthrough.
#[derive(Debug, Clone, Default)]
pub struct CreateUserOptions {
    pub role: Option<Role>,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
}

/// The local part of an address is case-significant, the domain is not;
/// only the domain is lowercased.
#[must_use]
pub fn normalize_email(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_ascii_lowercase()),
        None => trimmed.to_string(),
    }
}

pub async fn create_user(
    state: &AppState,
    command: CreateUserCommand,
    options: CreateUserOptions,
) -> Result<User, AccountError> {
    if command.email.trim().is_empty() {
        return Err(AccountError::BadRequest("email_required"));
    }
    if command.user_name.trim().is_empty() {
        return Err(AccountError::BadRequest("user_name_required"));
    }
    let email = normalize_email(&command.email);

    let password_hash = match command.password.as_deref() {
        Some(password) => Some(
            hash_password(password, &state.config.auth.kdf).map_err(|reason| {
                tracing::error!(event = "user_create_failed", reason);
                AccountError::Kdf
            })?,
        ),
        None => None,
    };

    let now = Utc::now();
    let mut user = User {
        id: Uuid::now_v7(),
        first_name: command.first_name.trim().to_string(),
        last_name: command.last_name.trim().to_string(),
        email,
        user_name: command.user_name.trim().to_string(),
        role: options.role.unwrap_or_default(),
        password_hash,
        is_staff: options.is_staff.unwrap_or(false),
        is_active: options.is_active.unwrap_or(true),
        is_superuser: options.is_superuser.unwrap_or(false),
        created_at: now,
        updated_at: now,
        last_login_at: None,
    };
    // Insert already-consistent flags; the post-insert sync then only has
    // the permission grants left to do.
    derive_role_flags(&mut user);

    let repo = UserRepo::new(&state.db);
    if let Err(err) = repo.create(&user).await {
        if is_unique_violation(&err) {
            tracing::warn!(event = "user_create_rejected", reason = "duplicate");
            return Err(AccountError::Conflict("email_or_user_name_taken"));
        }
        tracing::error!(event = "user_create_failed", error = %err);
        return Err(AccountError::DbError);
    }

    sync_role(state, &mut user).await?;

    tracing::info!(
        event = "user_created",
        user_id = %user.id,
        role = user.role.as_str(),
        "User created"
    );
    Ok(user)
}

/// The operational bootstrap path. Staff and superuser flags default to
/// true; passing either as `false` is a caller error, caught before any
/// write.
pub async fn create_superuser(
    state: &AppState,
    command: CreateUserCommand,
    options: CreateUserOptions,
) -> Result<User, AccountError> {
    if options.is_staff == Some(false) || options.is_superuser == Some(false) {
        return Err(AccountError::BadRequest("superuser_flags"));
    }
    let options = CreateUserOptions {
        role: Some(options.role.unwrap_or(Role::Admin)),
        is_active: options.is_active,
        is_staff: Some(true),
        is_superuser: Some(true),
    };
    create_user(state, command, options).await
}
