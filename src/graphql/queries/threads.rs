//! Thread queries

use std::sync::Arc;

use async_graphql::{Context, Object, Result};

use crate::services::{QueryArrayResult, QueryOneResult, ThreadService};

use super::super::types::{
    EntityResult, Thread, ThreadArray, ThreadArrayResult, ThreadResult,
};

#[derive(Default)]
pub struct ThreadQueries;

#[Object]
impl ThreadQueries {
    /// A single thread by id, or the not-found messages
    async fn get_thread_by_id(&self, ctx: &Context<'_>, id: String) -> Result<ThreadResult> {
        let threads = ctx.data::<Arc<ThreadService>>().map_err(|e| {
            async_graphql::Error::new(format!("Thread service unavailable: {:?}", e))
        })?;

        match threads.get_thread_by_id(&id).await.map_err(internal)? {
            QueryOneResult::Entity(thread) => Ok(ThreadResult::Thread(thread.into())),
            QueryOneResult::Messages(messages) => {
                Ok(ThreadResult::Err(EntityResult::new(messages)))
            }
        }
    }

    /// Threads of a category, newest first
    async fn get_threads_by_category_id(
        &self,
        ctx: &Context<'_>,
        category_id: String,
    ) -> Result<ThreadArrayResult> {
        let threads = ctx.data::<Arc<ThreadService>>().map_err(|e| {
            async_graphql::Error::new(format!("Thread service unavailable: {:?}", e))
        })?;

        match threads
            .get_threads_by_category_id(&category_id)
            .await
            .map_err(internal)?
        {
            QueryArrayResult::Entities(rows) => Ok(ThreadArrayResult::Threads(ThreadArray {
                threads: rows.into_iter().map(Into::into).collect(),
            })),
            QueryArrayResult::Messages(messages) => {
                Ok(ThreadArrayResult::Err(EntityResult::new(messages)))
            }
        }
    }

    /// Most recent threads across all categories
    async fn get_threads_latest(&self, ctx: &Context<'_>) -> Result<ThreadArrayResult> {
        let threads = ctx.data::<Arc<ThreadService>>().map_err(|e| {
            async_graphql::Error::new(format!("Thread service unavailable: {:?}", e))
        })?;

        match threads.get_threads_latest().await.map_err(internal)? {
            QueryArrayResult::Entities(rows) => Ok(ThreadArrayResult::Threads(ThreadArray {
                threads: rows.into_iter().map(Into::into).collect(),
            })),
            QueryArrayResult::Messages(messages) => {
                Ok(ThreadArrayResult::Err(EntityResult::new(messages)))
            }
        }
    }
}

/// Infrastructure failures propagate to the transport layer as GraphQL errors
fn internal(e: anyhow::Error) -> async_graphql::Error {
    tracing::error!(error = %e, "Thread query failed");
    async_graphql::Error::new(e.to_string())
}
