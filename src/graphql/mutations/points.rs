//! Point (vote) mutations
//!
//! Authentication-gated: both short-circuit with a fixed message before any
//! service call when the session carries no user id.

use std::sync::Arc;

use async_graphql::{Context, Object, Result};

use crate::services::PointService;

use super::super::session::SessionExt;

const NOT_LOGGED_IN: &str = "You must be logged in to set likes";

#[derive(Default)]
pub struct PointMutations;

#[Object]
impl PointMutations {
    /// Up/down-vote a thread. Returns a plain status string.
    async fn update_thread_point(
        &self,
        ctx: &Context<'_>,
        thread_id: String,
        increment: bool,
    ) -> Result<String> {
        let session = ctx.session()?;
        let user_id = match session.user_id() {
            Some(id) => id.to_string(),
            None => return Ok(NOT_LOGGED_IN.to_string()),
        };

        let points = ctx.data::<Arc<PointService>>().map_err(|e| {
            async_graphql::Error::new(format!("Point service unavailable: {:?}", e))
        })?;

        points
            .update_thread_point(&user_id, &thread_id, increment)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Thread point update failed");
                async_graphql::Error::new(e.to_string())
            })
    }

    /// Up/down-vote a thread item. Returns a plain status string.
    async fn update_thread_item_point(
        &self,
        ctx: &Context<'_>,
        thread_item_id: String,
        increment: bool,
    ) -> Result<String> {
        let session = ctx.session()?;
        let user_id = match session.user_id() {
            Some(id) => id.to_string(),
            None => return Ok(NOT_LOGGED_IN.to_string()),
        };

        let points = ctx.data::<Arc<PointService>>().map_err(|e| {
            async_graphql::Error::new(format!("Point service unavailable: {:?}", e))
        })?;

        points
            .update_thread_item_point(&user_id, &thread_item_id, increment)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Thread item point update failed");
                async_graphql::Error::new(e.to_string())
            })
    }
}
