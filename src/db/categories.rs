//! Thread categories repository

use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::sql_helpers::{new_id, now_iso8601};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadCategoryRecord {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_on: String,
}

/// One row of the top-category-thread aggregate: the latest threads of the
/// most active categories. Query-only, not owned by any writer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryThreadRecord {
    pub category_id: String,
    pub category_name: String,
    pub thread_id: String,
    pub title: String,
    pub title_created_on: String,
}

type CategoryRow = (String, String, Option<String>, String);

fn map_category(r: CategoryRow) -> ThreadCategoryRecord {
    ThreadCategoryRecord {
        id: r.0,
        name: r.1,
        description: r.2,
        created_on: r.3,
    }
}

pub struct CategoriesRepository {
    pool: SqlitePool,
}

impl CategoriesRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a category (used by seeding and tests)
    pub async fn create(&self, name: &str, description: Option<&str>) -> Result<ThreadCategoryRecord> {
        let id = new_id();
        let now = now_iso8601();

        sqlx::query(
            "INSERT INTO thread_categories (id, name, description, created_on) VALUES (?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(name)
        .bind(description)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to create category"))
    }

    /// Get category by ID
    pub async fn get_by_id(&self, id: &str) -> Result<Option<ThreadCategoryRecord>> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name, description, created_on FROM thread_categories WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(map_category))
    }

    /// Get category by name
    pub async fn get_by_name(&self, name: &str) -> Result<Option<ThreadCategoryRecord>> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name, description, created_on FROM thread_categories WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(map_category))
    }

    /// List all categories ordered by name
    pub async fn list_all(&self) -> Result<Vec<ThreadCategoryRecord>> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name, description, created_on FROM thread_categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(map_category).collect())
    }

    /// Latest threads of the most active categories: categories ranked by
    /// thread count descending (top `category_limit`), up to
    /// `threads_per_category` newest threads each.
    pub async fn top_category_threads(
        &self,
        category_limit: i64,
        threads_per_category: i64,
    ) -> Result<Vec<CategoryThreadRecord>> {
        let rows = sqlx::query_as::<_, (String, String, String, String, String)>(
            r#"
            SELECT c.id, c.name, t.id, t.title, t.created_on
            FROM threads t
            JOIN thread_categories c ON c.id = t.category_id
            JOIN (
                SELECT category_id, COUNT(*) AS thread_count
                FROM threads
                GROUP BY category_id
                ORDER BY thread_count DESC
                LIMIT ?
            ) top ON top.category_id = c.id
            WHERE (
                SELECT COUNT(*) FROM threads newer
                WHERE newer.category_id = t.category_id
                  AND newer.created_on > t.created_on
            ) < ?
            ORDER BY top.thread_count DESC, c.name, t.created_on DESC
            "#,
        )
        .bind(category_limit)
        .bind(threads_per_category)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| CategoryThreadRecord {
                category_id: r.0,
                category_name: r.1,
                thread_id: r.2,
                title: r.3,
                title_created_on: r.4,
            })
            .collect())
    }
}
