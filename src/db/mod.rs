//! Database connection and repositories

pub mod categories;
pub mod points;
pub mod schema;
pub mod sessions;
pub mod sql_helpers;
pub mod thread_items;
pub mod threads;
pub mod users;

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

pub use categories::{CategoriesRepository, CategoryThreadRecord, ThreadCategoryRecord};
pub use points::{PointsRepository, VoteOutcome};
pub use sessions::{SessionRecord, SessionsRepository};
pub use thread_items::{CreateThreadItem, ThreadItemRecord, ThreadItemsRepository};
pub use threads::{CreateThread, ThreadRecord, ThreadWithCategory, ThreadsRepository};
pub use users::{CreateUser, UserRecord, UsersRepository};

/// Database wrapper providing connection pool access
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database wrapper from an existing pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the maximum connection pool size from environment or default
    fn get_max_connections() -> u32 {
        std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10)
    }

    /// Open (creating if necessary) the SQLite database at `path`
    pub async fn connect(path: &str) -> Result<Self> {
        let options = if path == ":memory:" || path.starts_with("sqlite:") {
            path.parse::<SqliteConnectOptions>()?
        } else {
            // create_if_missing only creates the file, not its directory
            if let Some(parent) = std::path::Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(Self::get_max_connections())
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Open an in-memory database. SQLite gives every connection its own
    /// private memory database, so the pool is capped at one connection.
    pub async fn connect_in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Ok(Self { pool })
    }

    /// Run schema migrations and seeding
    pub async fn migrate(&self) -> Result<()> {
        schema::run_migrations(&self.pool).await
    }

    /// Access the underlying pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn users(&self) -> UsersRepository {
        UsersRepository::new(self.pool.clone())
    }

    pub fn threads(&self) -> ThreadsRepository {
        ThreadsRepository::new(self.pool.clone())
    }

    pub fn thread_items(&self) -> ThreadItemsRepository {
        ThreadItemsRepository::new(self.pool.clone())
    }

    pub fn categories(&self) -> CategoriesRepository {
        CategoriesRepository::new(self.pool.clone())
    }

    pub fn points(&self) -> PointsRepository {
        PointsRepository::new(self.pool.clone())
    }

    pub fn sessions(&self) -> SessionsRepository {
        SessionsRepository::new(self.pool.clone())
    }
}
