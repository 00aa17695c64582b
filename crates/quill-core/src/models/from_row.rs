use sqlx_core::from_row::FromRow;
use sqlx_core::row::Row;
use sqlx_sqlite::SqliteRow;
use std::str::FromStr;
use uuid::Uuid;

use super::enums::Role;
use super::structs::{Group, Permission, User};

fn parse_uuid(row: &SqliteRow, column: &str) -> Result<Uuid, sqlx_core::Error> {
    match row.try_get::<String, _>(column) {
        Ok(value) => Uuid::parse_str(&value).map_err(|err| sqlx_core::Error::Decode(Box::new(err))),
        Err(_) => {
            let bytes: Vec<u8> = row.try_get(column)?;
            Uuid::from_slice(&bytes).map_err(|err| sqlx_core::Error::Decode(Box::new(err)))
        }
    }
}

impl FromRow<'_, SqliteRow> for User {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx_core::Error> {
        let role: String = row.try_get("role")?;
        Ok(Self {
            id: parse_uuid(row, "id")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            email: row.try_get("email")?,
            user_name: row.try_get("user_name")?,
            role: Role::from_str(&role).map_err(|err| sqlx_core::Error::Decode(Box::new(err)))?,
            password_hash: row.try_get("password_hash")?,
            is_staff: row.try_get("is_staff")?,
            is_active: row.try_get("is_active")?,
            is_superuser: row.try_get("is_superuser")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            last_login_at: row.try_get("last_login_at")?,
        })
    }
}

impl FromRow<'_, SqliteRow> for Permission {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx_core::Error> {
        Ok(Self {
            id: parse_uuid(row, "id")?,
            codename: row.try_get("codename")?,
            name: row.try_get("name")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl FromRow<'_, SqliteRow> for Group {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx_core::Error> {
        Ok(Self {
            id: parse_uuid(row, "id")?,
            slug: row.try_get("slug")?,
            name: row.try_get("name")?,
            created_at: row.try_get("created_at")?,
        })
    }
}
