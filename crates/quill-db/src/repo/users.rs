use super::prelude::*;

pub struct UserRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user: &User) -> Result<(), sqlx_core::Error> {
        query!(
            r#"
            INSERT INTO users (
                id,
                first_name,
                last_name,
                email,
                user_name,
                role,
                password_hash,
                is_staff,
                is_active,
                is_superuser,
                created_at,
                updated_at,
                last_login_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
            user.id,
            user.first_name.as_str(),
            user.last_name.as_str(),
            user.email.as_str(),
            user.user_name.as_str(),
            user.role.as_str(),
            user.password_hash.as_deref(),
            user.is_staff,
            user.is_active,
            user.is_superuser,
            user.created_at,
            user.updated_at,
            user.last_login_at
        )
        .execute(self.pool)
        .await
        .map(|_| ())
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<User>, sqlx_core::Error> {
        query_as!(
            User,
            r#"
            SELECT
                id,
                first_name,
                last_name,
                email,
                user_name,
                role,
                password_hash,
                is_staff,
                is_active,
                is_superuser,
                created_at,
                updated_at,
                last_login_at
            FROM users
            WHERE id = ?1
            "#,
            id
        )
        .fetch_optional(self.pool)
        .await
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, sqlx_core::Error> {
        query_as!(
            User,
            r#"
            SELECT
                id,
                first_name,
                last_name,
                email,
                user_name,
                role,
                password_hash,
                is_staff,
                is_active,
                is_superuser,
                created_at,
                updated_at,
                last_login_at
            FROM users
            WHERE email = ?1
            "#,
            email
        )
        .fetch_optional(self.pool)
        .await
    }

    pub async fn get_by_user_name(
        &self,
        user_name: &str,
    ) -> Result<Option<User>, sqlx_core::Error> {
        query_as!(
            User,
            r#"
            SELECT
                id,
                first_name,
                last_name,
                email,
                user_name,
                role,
                password_hash,
                is_staff,
                is_active,
                is_superuser,
                created_at,
                updated_at,
                last_login_at
            FROM users
            WHERE user_name = ?1
            "#,
            user_name
        )
        .fetch_optional(self.pool)
        .await
    }

    /// Persists the role-derived fields. `created_at` is deliberately
    /// outside every UPDATE in this repo.
    pub async fn update_role_flags(
        &self,
        user_id: Uuid,
        role: Role,
        is_staff: bool,
        is_superuser: bool,
    ) -> Result<u64, sqlx_core::Error> {
        query!(
            r#"
            UPDATE users
            SET role = ?2,
                is_staff = ?3,
                is_superuser = ?4,
                updated_at = ?5
            WHERE id = ?1
            "#,
            user_id,
            role.as_str(),
            is_staff,
            is_superuser,
            Utc::now()
        )
        .execute(self.pool)
        .await
        .map(|result| result.rows_affected())
    }

    pub async fn update_last_login(
        &self,
        user_id: Uuid,
        last_login_at: DateTime<Utc>,
    ) -> Result<(), sqlx_core::Error> {
        query!(
            r#"
            UPDATE users
            SET last_login_at = ?2,
                updated_at = ?3
            WHERE id = ?1
            "#,
            user_id,
            last_login_at,
            last_login_at
        )
        .execute(self.pool)
        .await
        .map(|_| ())
    }

    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>, sqlx_core::Error> {
        query_as!(
            User,
            r#"
            SELECT
                id,
                first_name,
                last_name,
                email,
                user_name,
                role,
                password_hash,
                is_staff,
                is_active,
                is_superuser,
                created_at,
                updated_at,
                last_login_at
            FROM users
            ORDER BY created_at DESC
            LIMIT ?1 OFFSET ?2
            "#,
            limit,
            offset
        )
        .fetch_all(self.pool)
        .await
    }
}
