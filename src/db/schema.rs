//! Static schema migrations
//!
//! Tables are created with CREATE TABLE IF NOT EXISTS at startup; there is
//! no column-rename or type-change handling. Default thread categories are
//! seeded idempotently after the tables exist.

use anyhow::Result;
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::sql_helpers::{new_id, now_iso8601};

const CREATE_TABLES: &[(&str, &str)] = &[
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE COLLATE NOCASE,
            user_name TEXT NOT NULL UNIQUE COLLATE NOCASE,
            password TEXT NOT NULL,
            confirmed INTEGER NOT NULL DEFAULT 0,
            created_on TEXT NOT NULL,
            last_modified_on TEXT NOT NULL
        )
        "#,
    ),
    (
        "thread_categories",
        r#"
        CREATE TABLE IF NOT EXISTS thread_categories (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            description TEXT,
            created_on TEXT NOT NULL
        )
        "#,
    ),
    (
        "threads",
        r#"
        CREATE TABLE IF NOT EXISTS threads (
            id TEXT PRIMARY KEY,
            views INTEGER NOT NULL DEFAULT 0,
            is_disabled INTEGER NOT NULL DEFAULT 0,
            title TEXT NOT NULL,
            body TEXT NOT NULL,
            points INTEGER NOT NULL DEFAULT 0,
            created_on TEXT NOT NULL,
            last_modified_on TEXT NOT NULL,
            user_id TEXT NOT NULL REFERENCES users(id),
            category_id TEXT NOT NULL REFERENCES thread_categories(id)
        )
        "#,
    ),
    (
        "thread_items",
        r#"
        CREATE TABLE IF NOT EXISTS thread_items (
            id TEXT PRIMARY KEY,
            views INTEGER NOT NULL DEFAULT 0,
            is_disabled INTEGER NOT NULL DEFAULT 0,
            body TEXT NOT NULL,
            points INTEGER NOT NULL DEFAULT 0,
            created_on TEXT NOT NULL,
            last_modified_on TEXT NOT NULL,
            user_id TEXT NOT NULL REFERENCES users(id),
            thread_id TEXT NOT NULL REFERENCES threads(id)
        )
        "#,
    ),
    (
        "thread_points",
        r#"
        CREATE TABLE IF NOT EXISTS thread_points (
            id TEXT PRIMARY KEY,
            is_decrement INTEGER NOT NULL DEFAULT 0,
            user_id TEXT NOT NULL REFERENCES users(id),
            thread_id TEXT NOT NULL REFERENCES threads(id),
            created_on TEXT NOT NULL,
            UNIQUE(user_id, thread_id)
        )
        "#,
    ),
    (
        "thread_item_points",
        r#"
        CREATE TABLE IF NOT EXISTS thread_item_points (
            id TEXT PRIMARY KEY,
            is_decrement INTEGER NOT NULL DEFAULT 0,
            user_id TEXT NOT NULL REFERENCES users(id),
            thread_item_id TEXT NOT NULL REFERENCES thread_items(id),
            created_on TEXT NOT NULL,
            UNIQUE(user_id, thread_item_id)
        )
        "#,
    ),
    (
        "sessions",
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            id TEXT PRIMARY KEY,
            user_id TEXT REFERENCES users(id),
            loaded_count INTEGER NOT NULL DEFAULT 0,
            created_on TEXT NOT NULL,
            expires_on TEXT NOT NULL
        )
        "#,
    ),
];

const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_threads_category ON threads(category_id, created_on)",
    "CREATE INDEX IF NOT EXISTS idx_threads_user ON threads(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_thread_items_thread ON thread_items(thread_id, created_on)",
    "CREATE INDEX IF NOT EXISTS idx_thread_items_user ON thread_items(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_sessions_expires ON sessions(expires_on)",
];

/// Default categories seeded on first start
const DEFAULT_CATEGORIES: &[&str] = &[
    "General",
    "Programming",
    "Cooking",
    "Gaming",
    "Sports",
    "Travel",
];

/// Create all tables and indexes, then seed default categories.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    for (name, ddl) in CREATE_TABLES {
        debug!(table = name, "Ensuring table exists");
        sqlx::query(ddl).execute(pool).await?;
    }
    for ddl in CREATE_INDEXES {
        sqlx::query(ddl).execute(pool).await?;
    }

    seed_categories(pool).await?;

    info!("Schema migrations complete");
    Ok(())
}

/// Insert the default thread categories if they are not present.
async fn seed_categories(pool: &SqlitePool) -> Result<()> {
    let now = now_iso8601();
    for name in DEFAULT_CATEGORIES {
        sqlx::query(
            "INSERT INTO thread_categories (id, name, created_on) VALUES (?, ?, ?) \
             ON CONFLICT(name) DO NOTHING",
        )
        .bind(new_id())
        .bind(name)
        .bind(&now)
        .execute(pool)
        .await?;
    }
    Ok(())
}
