//! Thread and thread item creation mutations
//!
//! Both return [EntityResult] regardless of outcome: the create contract
//! surfaces messages only, never the created entity.

use std::sync::Arc;

use async_graphql::{Context, Object, Result};

use crate::services::{QueryOneResult, ThreadItemService, ThreadService};

use super::super::types::EntityResult;

#[derive(Default)]
pub struct ThreadMutations;

#[Object]
impl ThreadMutations {
    /// Create a thread in a category. Returns validation or status messages.
    async fn create_thread(
        &self,
        ctx: &Context<'_>,
        user_id: Option<String>,
        category_id: String,
        title: String,
        body: String,
    ) -> Result<EntityResult> {
        let threads = ctx.data::<Arc<ThreadService>>().map_err(|e| {
            async_graphql::Error::new(format!("Thread service unavailable: {:?}", e))
        })?;

        match threads
            .create_thread(user_id.as_deref(), &category_id, &title, &body)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Create thread failed");
                async_graphql::Error::new(e.to_string())
            })? {
            QueryOneResult::Messages(messages) => Ok(EntityResult::new(messages)),
            // The create contract never returns the entity; guard anyway
            QueryOneResult::Entity(_) => Ok(EntityResult::single("Thread created successfully")),
        }
    }

    /// Create a reply within a thread. Returns messages only.
    async fn create_thread_item(
        &self,
        ctx: &Context<'_>,
        user_id: Option<String>,
        thread_id: String,
        body: String,
    ) -> Result<EntityResult> {
        let items = ctx.data::<Arc<ThreadItemService>>().map_err(|e| {
            async_graphql::Error::new(format!("ThreadItem service unavailable: {:?}", e))
        })?;

        match items
            .create_thread_item(user_id.as_deref(), &thread_id, &body)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Create thread item failed");
                async_graphql::Error::new(e.to_string())
            })? {
            QueryOneResult::Messages(messages) => Ok(EntityResult::new(messages)),
            QueryOneResult::Entity(_) => {
                Ok(EntityResult::single("ThreadItem created successfully"))
            }
        }
    }
}
