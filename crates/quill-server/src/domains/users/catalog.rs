use thiserror::Error;

use quill_core::Permission;
use quill_db::repo::PermissionRepo;
use quill_db::SqlitePool;

pub const VIEW_POST: &str = "view_post";
pub const ADD_POST: &str = "add_post";
pub const CHANGE_POST: &str = "change_post";
pub const DELETE_POST: &str = "delete_post";

pub const CONTENT_CODENAMES: [&str; 4] = [VIEW_POST, ADD_POST, CHANGE_POST, DELETE_POST];

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("permission record missing: {0}")]
    Missing(&'static str),
    #[error(transparent)]
    Db(#[from] sqlx_core::Error),
}

/// The content permissions granted and revoked by role sync, resolved once
/// at bootstrap. A hole in the seeded catalog aborts startup instead of
/// failing the first save.
#[derive(Debug, Clone)]
pub struct PermissionCatalog {
    pub view_post: Permission,
    pub add_post: Permission,
    pub change_post: Permission,
    pub delete_post: Permission,
}

impl PermissionCatalog {
    pub async fn load(pool: &SqlitePool) -> Result<Self, CatalogError> {
        let repo = PermissionRepo::new(pool);
        Ok(Self {
            view_post: require(&repo, VIEW_POST).await?,
            add_post: require(&repo, ADD_POST).await?,
            change_post: require(&repo, CHANGE_POST).await?,
            delete_post: require(&repo, DELETE_POST).await?,
        })
    }

    #[must_use]
    pub fn content_permissions(&self) -> [&Permission; 4] {
        [
            &self.view_post,
            &self.add_post,
            &self.change_post,
            &self.delete_post,
        ]
    }
}

async fn require(
    repo: &PermissionRepo<'_>,
    codename: &'static str,
) -> Result<Permission, CatalogError> {
    repo.get_by_codename(codename)
        .await?
        .ok_or(CatalogError::Missing(codename))
}
