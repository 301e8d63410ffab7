//! Category service

use anyhow::Result;

use crate::db::{CategoryThreadRecord, Database, ThreadCategoryRecord};

use super::result::QueryArrayResult;

/// How many categories the top-category-thread aggregate covers
const TOP_CATEGORY_LIMIT: i64 = 3;
/// How many recent threads are shown per category in the aggregate
const THREADS_PER_CATEGORY: i64 = 3;

pub struct CategoryService {
    db: Database,
}

impl CategoryService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// All categories ordered by name
    pub async fn get_all_categories(&self) -> Result<QueryArrayResult<ThreadCategoryRecord>> {
        let categories = self.db.categories().list_all().await?;
        Ok(QueryArrayResult::Entities(categories))
    }

    /// Latest threads of the most active categories (read-only aggregate)
    pub async fn get_top_category_thread(&self) -> Result<Vec<CategoryThreadRecord>> {
        self.db
            .categories()
            .top_category_threads(TOP_CATEGORY_LIMIT, THREADS_PER_CATEGORY)
            .await
    }
}
