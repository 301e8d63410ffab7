//! Sessions repository
//!
//! Server-side session rows keyed by the cookie-carried session id. Expired
//! rows are ignored by lookups and removed by [SessionsRepository::delete_expired].

use anyhow::Result;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::sql_helpers::{datetime_to_str, new_id, now_iso8601};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: String,
    pub user_id: Option<String>,
    pub loaded_count: i64,
    pub created_on: String,
    pub expires_on: String,
}

type SessionRow = (String, Option<String>, i64, String, String);

fn map_session(r: SessionRow) -> SessionRecord {
    SessionRecord {
        id: r.0,
        user_id: r.1,
        loaded_count: r.2,
        created_on: r.3,
        expires_on: r.4,
    }
}

pub struct SessionsRepository {
    pool: SqlitePool,
}

impl SessionsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a fresh anonymous session valid for `ttl_secs`
    pub async fn create(&self, ttl_secs: i64) -> Result<SessionRecord> {
        let id = new_id();
        let now = now_iso8601();
        let expires = datetime_to_str(chrono::Utc::now() + Duration::seconds(ttl_secs));

        sqlx::query(
            "INSERT INTO sessions (id, user_id, loaded_count, created_on, expires_on) \
             VALUES (?, NULL, 0, ?, ?)",
        )
        .bind(&id)
        .bind(&now)
        .bind(&expires)
        .execute(&self.pool)
        .await?;

        Ok(SessionRecord {
            id,
            user_id: None,
            loaded_count: 0,
            created_on: now,
            expires_on: expires,
        })
    }

    /// Get a live (unexpired) session by id
    pub async fn get_live(&self, id: &str) -> Result<Option<SessionRecord>> {
        let now = now_iso8601();
        let row = sqlx::query_as::<_, SessionRow>(
            "SELECT id, user_id, loaded_count, created_on, expires_on \
             FROM sessions WHERE id = ? AND expires_on > ?",
        )
        .bind(id)
        .bind(&now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(map_session))
    }

    /// Increment the request-load counter, returning the new value
    pub async fn increment_loaded_count(&self, id: &str) -> Result<i64> {
        sqlx::query("UPDATE sessions SET loaded_count = loaded_count + 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let row = sqlx::query_as::<_, (i64,)>("SELECT loaded_count FROM sessions WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }

    /// Attach an authenticated user to the session (at login)
    pub async fn set_user(&self, id: &str, user_id: Option<&str>) -> Result<()> {
        sqlx::query("UPDATE sessions SET user_id = ? WHERE id = ?")
            .bind(user_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Destroy a session (at logout)
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove expired sessions, returning how many were swept
    pub async fn delete_expired(&self) -> Result<u64> {
        let now = now_iso8601();
        let result = sqlx::query("DELETE FROM sessions WHERE expires_on <= ?")
            .bind(&now)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
