macro_rules! query {
    ($sql:expr $(, $arg:expr)* $(,)?) => {{
        #[allow(unused_mut)]
        let mut q = sqlx_core::query::query::<sqlx_sqlite::Sqlite>($sql);
        $(q = q.bind($arg);)*
        q
    }};
}

macro_rules! query_as {
    ($ty:ty, $sql:expr $(, $arg:expr)* $(,)?) => {{
        #[allow(unused_mut)]
        let mut q = sqlx_core::query_as::query_as::<sqlx_sqlite::Sqlite, $ty>($sql);
        $(q = q.bind($arg);)*
        q
    }};
}

pub(crate) mod prelude {
    pub(crate) use crate::SqlitePool;
    pub(crate) use chrono::{DateTime, Utc};
    pub(crate) use quill_core::{Group, Permission, Role, User};
    pub(crate) use sqlx_core::row::Row;
    pub(crate) use uuid::Uuid;
}

mod groups;
mod permissions;
mod users;

pub use groups::GroupRepo;
pub use permissions::PermissionRepo;
pub use users::UserRepo;
