//! Thread item queries

use std::sync::Arc;

use async_graphql::{Context, Object, Result};

use crate::services::{QueryArrayResult, ThreadItemService};

use super::super::types::{EntityResult, ThreadItemArray, ThreadItemArrayResult};

#[derive(Default)]
pub struct ThreadItemQueries;

#[Object]
impl ThreadItemQueries {
    /// Replies of a thread, newest first
    async fn get_thread_item_by_thread_id(
        &self,
        ctx: &Context<'_>,
        thread_id: String,
    ) -> Result<ThreadItemArrayResult> {
        let items = ctx.data::<Arc<ThreadItemService>>().map_err(|e| {
            async_graphql::Error::new(format!("ThreadItem service unavailable: {:?}", e))
        })?;

        match items
            .get_thread_items_by_thread_id(&thread_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Thread item query failed");
                async_graphql::Error::new(e.to_string())
            })? {
            QueryArrayResult::Entities(rows) => {
                Ok(ThreadItemArrayResult::ThreadItems(ThreadItemArray {
                    thread_items: rows.into_iter().map(Into::into).collect(),
                }))
            }
            QueryArrayResult::Messages(messages) => {
                Ok(ThreadItemArrayResult::Err(EntityResult::new(messages)))
            }
        }
    }
}
