use super::prelude::*;

pub struct PermissionRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> PermissionRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_by_codename(
        &self,
        codename: &str,
    ) -> Result<Option<Permission>, sqlx_core::Error> {
        query_as!(
            Permission,
            r#"
            SELECT id, codename, name, created_at
            FROM permissions
            WHERE codename = ?1
            "#,
            codename
        )
        .fetch_optional(self.pool)
        .await
    }

    /// Idempotent: granting an already-held permission is a no-op.
    pub async fn grant(
        &self,
        user_id: Uuid,
        permission_id: Uuid,
    ) -> Result<(), sqlx_core::Error> {
        query!(
            r#"
            INSERT OR IGNORE INTO user_permissions (user_id, permission_id, created_at)
            VALUES (?1, ?2, ?3)
            "#,
            user_id,
            permission_id,
            Utc::now()
        )
        .execute(self.pool)
        .await
        .map(|_| ())
    }

    /// Idempotent: revoking an absent permission is a no-op.
    pub async fn revoke(
        &self,
        user_id: Uuid,
        permission_id: Uuid,
    ) -> Result<(), sqlx_core::Error> {
        query!(
            r#"
            DELETE FROM user_permissions
            WHERE user_id = ?1 AND permission_id = ?2
            "#,
            user_id,
            permission_id
        )
        .execute(self.pool)
        .await
        .map(|_| ())
    }

    pub async fn codenames_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<String>, sqlx_core::Error> {
        let rows = query!(
            r#"
            SELECT p.codename AS codename
            FROM user_permissions up
            JOIN permissions p ON p.id = up.permission_id
            WHERE up.user_id = ?1
            ORDER BY p.codename
            "#,
            user_id
        )
        .fetch_all(self.pool)
        .await?;
        rows.iter()
            .map(|row| row.try_get::<String, _>("codename"))
            .collect()
    }

    pub async fn has_permission(
        &self,
        user_id: Uuid,
        permission_id: Uuid,
    ) -> Result<bool, sqlx_core::Error> {
        let row = query!(
            r#"
            SELECT COUNT(*) AS count
            FROM user_permissions
            WHERE user_id = ?1 AND permission_id = ?2
            "#,
            user_id,
            permission_id
        )
        .fetch_one(self.pool)
        .await?;
        let count: i64 = row.try_get("count")?;
        Ok(count > 0)
    }
}
