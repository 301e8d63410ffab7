//! Thread items repository
//!
//! A thread item is a reply within a thread; it belongs to one thread and
//! one user.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::sql_helpers::{new_id, now_iso8601};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadItemRecord {
    pub id: String,
    pub views: i64,
    pub is_disabled: bool,
    pub body: String,
    pub points: i64,
    pub created_on: String,
    pub last_modified_on: String,
    pub user_id: String,
    pub thread_id: String,
}

#[derive(Debug, Clone)]
pub struct CreateThreadItem {
    pub body: String,
    pub user_id: String,
    pub thread_id: String,
}

type ThreadItemRow = (String, i64, i32, String, i64, String, String, String, String);

fn map_item(r: ThreadItemRow) -> ThreadItemRecord {
    ThreadItemRecord {
        id: r.0,
        views: r.1,
        is_disabled: r.2 != 0,
        body: r.3,
        points: r.4,
        created_on: r.5,
        last_modified_on: r.6,
        user_id: r.7,
        thread_id: r.8,
    }
}

const ITEM_COLUMNS: &str = "id, views, is_disabled, body, points, \
     created_on, last_modified_on, user_id, thread_id";

pub struct ThreadItemsRepository {
    pool: SqlitePool,
}

impl ThreadItemsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new thread item linking user and thread
    pub async fn create(&self, item: CreateThreadItem) -> Result<ThreadItemRecord> {
        let id = new_id();
        let now = now_iso8601();

        sqlx::query(
            r#"
            INSERT INTO thread_items (id, body, created_on, last_modified_on, user_id, thread_id)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&item.body)
        .bind(&now)
        .bind(&now)
        .bind(&item.user_id)
        .bind(&item.thread_id)
        .execute(&self.pool)
        .await?;

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to create thread item"))
    }

    /// Get thread item by ID
    pub async fn get_by_id(&self, id: &str) -> Result<Option<ThreadItemRecord>> {
        let row = sqlx::query_as::<_, ThreadItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM thread_items WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(map_item))
    }

    /// List items of a thread, newest first
    pub async fn list_by_thread(&self, thread_id: &str) -> Result<Vec<ThreadItemRecord>> {
        let rows = sqlx::query_as::<_, ThreadItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM thread_items WHERE thread_id = ? ORDER BY created_on DESC"
        ))
        .bind(thread_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(map_item).collect())
    }

    /// List items created by a user, newest first (for the Me view)
    pub async fn list_by_user(&self, user_id: &str) -> Result<Vec<ThreadItemRecord>> {
        let rows = sqlx::query_as::<_, ThreadItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM thread_items WHERE user_id = ? ORDER BY created_on DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(map_item).collect())
    }
}
