//! Thread item service
//!
//! Replies within a thread: body validation, login and thread-existence
//! checks, then persistence.

use anyhow::Result;
use tracing::debug;

use crate::db::{CreateThreadItem, Database, ThreadItemRecord};

use super::result::{QueryArrayResult, QueryOneResult};
use super::validators::is_thread_body_valid;

pub struct ThreadItemService {
    db: Database,
}

impl ThreadItemService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Validate and create a reply. Returns messages only, like thread
    /// creation.
    pub async fn create_thread_item(
        &self,
        user_id: Option<&str>,
        thread_id: &str,
        body: &str,
    ) -> Result<QueryOneResult<ThreadItemRecord>> {
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

        if self.db.threads().get_by_id(thread_id).await?.is_none() {
            return Ok(QueryOneResult::message("Thread not found"));
        }

        let item = self
            .db
            .thread_items()
            .create(CreateThreadItem {
                body: body.to_string(),
                user_id: user_id.to_string(),
                thread_id: thread_id.to_string(),
            })
            .await?;

        debug!(thread_item_id = %item.id, "Thread item created");
        Ok(QueryOneResult::message("ThreadItem created successfully"))
    }

    /// Replies of a thread, newest first
    pub async fn get_thread_items_by_thread_id(
        &self,
        thread_id: &str,
    ) -> Result<QueryArrayResult<ThreadItemRecord>> {
        let items = self.db.thread_items().list_by_thread(thread_id).await?;
        Ok(QueryArrayResult::Entities(items))
    }
}
