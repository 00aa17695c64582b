use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Role, User};

/// Authenticated-request principal, attached to the request as an axum
/// extension by the auth middleware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: String,
    pub user_name: String,
    pub role: Role,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl Identity {
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
            user_name: user.user_name.clone(),
            role: user.role,
            is_staff: user.is_staff,
            is_superuser: user.is_superuser,
        }
    }
}
