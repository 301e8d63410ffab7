//! Users repository
//!
//! Raw CRUD over the users table. Password hashing, validation, and the
//! message-bearing result shapes live in the service layer.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::sql_helpers::{new_id, now_iso8601};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub user_name: String,
    pub password: String,
    pub confirmed: bool,
    pub created_on: String,
    pub last_modified_on: String,
}

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub user_name: String,
    pub password: String,
}

type UserRow = (String, String, String, String, i32, String, String);

fn map_user(r: UserRow) -> UserRecord {
    UserRecord {
        id: r.0,
        email: r.1,
        user_name: r.2,
        password: r.3,
        confirmed: r.4 != 0,
        created_on: r.5,
        last_modified_on: r.6,
    }
}

const USER_COLUMNS: &str =
    "id, email, user_name, password, confirmed, created_on, last_modified_on";

pub struct UsersRepository {
    pool: SqlitePool,
}

impl UsersRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user (unconfirmed until the confirmation step)
    pub async fn create(&self, user: CreateUser) -> Result<UserRecord> {
        let id = new_id();
        let now = now_iso8601();

        sqlx::query(
            r#"
            INSERT INTO users (id, email, user_name, password, confirmed, created_on, last_modified_on)
            VALUES (?, ?, ?, ?, 0, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&user.email)
        .bind(&user.user_name)
        .bind(&user.password)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to create user"))
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: &str) -> Result<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(map_user))
    }

    /// Get user by userName (case-insensitive)
    pub async fn get_by_user_name(&self, user_name: &str) -> Result<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_name = ? COLLATE NOCASE"
        ))
        .bind(user_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(map_user))
    }

    /// Get user by email (case-insensitive)
    pub async fn get_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ? COLLATE NOCASE"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(map_user))
    }

    /// Mark a user as having confirmed their registration email
    pub async fn set_confirmed(&self, email: &str, confirmed: bool) -> Result<bool> {
        let now = now_iso8601();
        let result = sqlx::query(
            "UPDATE users SET confirmed = ?, last_modified_on = ? WHERE email = ? COLLATE NOCASE",
        )
        .bind(if confirmed { 1 } else { 0 })
        .bind(&now)
        .bind(email)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count users
    pub async fn count(&self) -> Result<i64> {
        let row = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }
}
