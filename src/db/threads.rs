//! Threads repository
//!
//! Threads belong to one user and one category. Listings are ordered newest
//! first; the category is joined eagerly where callers need it.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::categories::ThreadCategoryRecord;
use super::sql_helpers::{new_id, now_iso8601};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadRecord {
    pub id: String,
    pub views: i64,
    pub is_disabled: bool,
    pub title: String,
    pub body: String,
    pub points: i64,
    pub created_on: String,
    pub last_modified_on: String,
    pub user_id: String,
    pub category_id: String,
}

/// Thread with its category joined in (for category listings)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadWithCategory {
    #[serde(flatten)]
    pub thread: ThreadRecord,
    pub category: ThreadCategoryRecord,
}

#[derive(Debug, Clone)]
pub struct CreateThread {
    pub title: String,
    pub body: String,
    pub user_id: String,
    pub category_id: String,
}

type ThreadRow = (
    String,
    i64,
    i32,
    String,
    String,
    i64,
    String,
    String,
    String,
    String,
);

fn map_thread(r: ThreadRow) -> ThreadRecord {
    ThreadRecord {
        id: r.0,
        views: r.1,
        is_disabled: r.2 != 0,
        title: r.3,
        body: r.4,
        points: r.5,
        created_on: r.6,
        last_modified_on: r.7,
        user_id: r.8,
        category_id: r.9,
    }
}

const THREAD_COLUMNS: &str = "id, views, is_disabled, title, body, points, \
     created_on, last_modified_on, user_id, category_id";

pub struct ThreadsRepository {
    pool: SqlitePool,
}

impl ThreadsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new thread linking user and category
    pub async fn create(&self, thread: CreateThread) -> Result<ThreadRecord> {
        let id = new_id();
        let now = now_iso8601();

        sqlx::query(
            r#"
            INSERT INTO threads (id, title, body, created_on, last_modified_on, user_id, category_id)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&thread.title)
        .bind(&thread.body)
        .bind(&now)
        .bind(&now)
        .bind(&thread.user_id)
        .bind(&thread.category_id)
        .execute(&self.pool)
        .await?;

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to create thread"))
    }

    /// Get thread by ID
    pub async fn get_by_id(&self, id: &str) -> Result<Option<ThreadRecord>> {
        let row = sqlx::query_as::<_, ThreadRow>(&format!(
            "SELECT {THREAD_COLUMNS} FROM threads WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(map_thread))
    }

    /// List threads of a category with the category joined, newest first
    pub async fn list_by_category(&self, category_id: &str) -> Result<Vec<ThreadWithCategory>> {
        let rows = sqlx::query_as::<_, (
            String,
            i64,
            i32,
            String,
            String,
            i64,
            String,
            String,
            String,
            String,
            String,
            Option<String>,
            String,
        )>(
            r#"
            SELECT t.id, t.views, t.is_disabled, t.title, t.body, t.points,
                   t.created_on, t.last_modified_on, t.user_id, t.category_id,
                   c.name, c.description, c.created_on
            FROM threads t
            JOIN thread_categories c ON c.id = t.category_id
            WHERE t.category_id = ?
            ORDER BY t.created_on DESC
            "#,
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| ThreadWithCategory {
                thread: map_thread((
                    r.0, r.1, r.2, r.3, r.4, r.5, r.6, r.7, r.8, r.9.clone(),
                )),
                category: ThreadCategoryRecord {
                    id: r.9,
                    name: r.10,
                    description: r.11,
                    created_on: r.12,
                },
            })
            .collect())
    }

    /// Most recent threads across all categories, newest first
    pub async fn list_latest(&self, limit: i64) -> Result<Vec<ThreadWithCategory>> {
        let rows = sqlx::query_as::<_, (
            String,
            i64,
            i32,
            String,
            String,
            i64,
            String,
            String,
            String,
            String,
            String,
            Option<String>,
            String,
        )>(
            r#"
            SELECT t.id, t.views, t.is_disabled, t.title, t.body, t.points,
                   t.created_on, t.last_modified_on, t.user_id, t.category_id,
                   c.name, c.description, c.created_on
            FROM threads t
            JOIN thread_categories c ON c.id = t.category_id
            ORDER BY t.created_on DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| ThreadWithCategory {
                thread: map_thread((
                    r.0, r.1, r.2, r.3, r.4, r.5, r.6, r.7, r.8, r.9.clone(),
                )),
                category: ThreadCategoryRecord {
                    id: r.9,
                    name: r.10,
                    description: r.11,
                    created_on: r.12,
                },
            })
            .collect())
    }

    /// List threads created by a user, newest first (for the Me view)
    pub async fn list_by_user(&self, user_id: &str) -> Result<Vec<ThreadRecord>> {
        let rows = sqlx::query_as::<_, ThreadRow>(&format!(
            "SELECT {THREAD_COLUMNS} FROM threads WHERE user_id = ? ORDER BY created_on DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(map_thread).collect())
    }

    /// Count threads in a category
    pub async fn count_by_category(&self, category_id: &str) -> Result<i64> {
        let row =
            sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM threads WHERE category_id = ?")
                .bind(category_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(row.0)
    }
}
