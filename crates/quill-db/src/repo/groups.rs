use super::prelude::*;

pub struct GroupRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> GroupRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, group: &Group) -> Result<(), sqlx_core::Error> {
        query!(
            r#"
            INSERT INTO groups (id, slug, name, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            group.id,
            group.slug.as_str(),
            group.name.as_str(),
            group.created_at
        )
        .execute(self.pool)
        .await
        .map(|_| ())
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Group>, sqlx_core::Error> {
        query_as!(
            Group,
            r#"
            SELECT id, slug, name, created_at
            FROM groups
            WHERE slug = ?1
            "#,
            slug
        )
        .fetch_optional(self.pool)
        .await
    }

    pub async fn add_member(&self, group_id: Uuid, user_id: Uuid) -> Result<(), sqlx_core::Error> {
        query!(
            r#"
            INSERT OR IGNORE INTO user_groups (group_id, user_id, created_at)
            VALUES (?1, ?2, ?3)
            "#,
            group_id,
            user_id,
            Utc::now()
        )
        .execute(self.pool)
        .await
        .map(|_| ())
    }

    pub async fn remove_member(
        &self,
        group_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), sqlx_core::Error> {
        query!(
            r#"
            DELETE FROM user_groups
            WHERE group_id = ?1 AND user_id = ?2
            "#,
            group_id,
            user_id
        )
        .execute(self.pool)
        .await
        .map(|_| ())
    }

    pub async fn slugs_for_user(&self, user_id: Uuid) -> Result<Vec<String>, sqlx_core::Error> {
        let rows = query!(
            r#"
            SELECT g.slug AS slug
            FROM user_groups ug
            JOIN groups g ON g.id = ug.group_id
            WHERE ug.user_id = ?1
            ORDER BY g.slug
            "#,
            user_id
        )
        .fetch_all(self.pool)
        .await?;
        rows.iter()
            .map(|row| row.try_get::<String, _>("slug"))
            .collect()
    }
}
