//! Thread service
//!
//! Validation plus conditional persistence over [ThreadsRepository]. The
//! create path returns messages only (success or failure); the created
//! entity is observable via [ThreadService::get_thread_by_id].

use anyhow::Result;
use tracing::debug;

use crate::db::{CreateThread, Database, ThreadRecord, ThreadWithCategory};

use super::result::{QueryArrayResult, QueryOneResult};
use super::validators::{is_thread_body_valid, is_thread_title_valid};

/// How many threads `get_threads_latest` returns
const LATEST_THREAD_LIMIT: i64 = 10;

pub struct ThreadService {
    db: Database,
}

impl ThreadService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Validate and create a thread. Fails with a message when the title or
    /// body is invalid, the caller is not logged in, or the category misses.
    pub async fn create_thread(
        &self,
        user_id: Option<&str>,
        category_id: &str,
        title: &str,
        body: &str,
    ) -> Result<QueryOneResult<ThreadRecord>> {
        let title_message = is_thread_title_valid(title);
        if !title_message.is_empty() {
            return Ok(QueryOneResult::message(title_message));
        }

        let body_message = is_thread_body_valid(body);
        if !body_message.is_empty() {
            return Ok(QueryOneResult::message(body_message));
        }

        let user_id = match user_id {
            Some(id) if !id.is_empty() => id,
            _ => return Ok(QueryOneResult::message("User is not logged in")),
        };

        if self.db.users().get_by_id(user_id).await?.is_none() {
            return Ok(QueryOneResult::message("User not found"));
        }

        if self.db.categories().get_by_id(category_id).await?.is_none() {
            return Ok(QueryOneResult::message("Category not found"));
        }

        let thread = self
            .db
            .threads()
            .create(CreateThread {
                title: title.to_string(),
                body: body.to_string(),
                user_id: user_id.to_string(),
                category_id: category_id.to_string(),
            })
            .await?;

        debug!(thread_id = %thread.id, "Thread created");
        Ok(QueryOneResult::message("Thread created successfully"))
    }

    /// Get a thread by id, or a not-found message
    pub async fn get_thread_by_id(&self, id: &str) -> Result<QueryOneResult<ThreadRecord>> {
        match self.db.threads().get_by_id(id).await? {
            Some(thread) => Ok(QueryOneResult::Entity(thread)),
            None => Ok(QueryOneResult::message("Thread not found")),
        }
    }

    /// Threads of a category, newest first. Zero rows is a valid empty
    /// result, not an error.
    pub async fn get_threads_by_category_id(
        &self,
        category_id: &str,
    ) -> Result<QueryArrayResult<ThreadWithCategory>> {
        let threads = self.db.threads().list_by_category(category_id).await?;
        Ok(QueryArrayResult::Entities(threads))
    }

    /// Most recent threads across all categories, newest first
    pub async fn get_threads_latest(&self) -> Result<QueryArrayResult<ThreadWithCategory>> {
        let threads = self.db.threads().list_latest(LATEST_THREAD_LIMIT).await?;
        Ok(QueryArrayResult::Entities(threads))
    }
}
