//! User table operations

use anyhow::Result;
use sqlx::FromRow;

use crate::db::DbEngine;
use crate::models::User;

/// Database row for user table
#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    email: String,
    username: String,
    password: String,
    created_at: i64,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            id: self.id,
            email: self.email,
            username: self.username,
            password: self.password,
            created_at: self.created_at,
        }
    }
}

/// User table operations
pub struct UserTable;

impl UserTable {
    /// Get user by ID
    pub async fn get_by_id(id: i64) -> Result<Option<User>> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let row: Option<UserRow> = sqlx::query_as("SELECT * FROM user WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(|r| r.into_user()))
    }

    /// Get user by email
    pub async fn get_by_email(email: &str) -> Result<Option<User>> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let row: Option<UserRow> = sqlx::query_as("SELECT * FROM user WHERE email = ?")
            .bind(email)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(|r| r.into_user()))
    }

    /// Get user by username
    pub async fn get_by_username(username: &str) -> Result<Option<User>> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let row: Option<UserRow> = sqlx::query_as("SELECT * FROM user WHERE username = ?")
            .bind(username)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(|r| r.into_user()))
    }

    /// Insert a user, returning the new row id
    pub async fn insert(user: &User) -> Result<i64> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let result =
            sqlx::query("INSERT INTO user (email, username, password) VALUES (?, ?, ?)")
                .bind(&user.email)
                .bind(&user.username)
                .bind(&user.password)
                .execute(pool)
                .await?;

        Ok(result.last_insert_rowid())
    }
}
