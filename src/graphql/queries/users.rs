//! User queries

use std::sync::Arc;

use async_graphql::{Context, Object, Result};

use crate::services::{QueryOneResult, UserService};

use super::super::session::SessionExt;
use super::super::types::{EntityResult, UserResult};

#[derive(Default)]
pub struct UserQueries;

#[Object]
impl UserQueries {
    /// The current user with related threads and replies. Short-circuits
    /// with a message when the session carries no user id.
    async fn me(&self, ctx: &Context<'_>) -> Result<UserResult> {
        let session = ctx.session()?;
        let user_id = match session.user_id() {
            Some(id) => id.to_string(),
            None => {
                return Ok(UserResult::Err(EntityResult::single("User not logged in")))
            }
        };

        let users = ctx.data::<Arc<UserService>>().map_err(|e| {
            async_graphql::Error::new(format!("User service unavailable: {:?}", e))
        })?;

        match users.me(&user_id).await.map_err(|e| {
            tracing::error!(error = %e, "Me query failed");
            async_graphql::Error::new(e.to_string())
        })? {
            QueryOneResult::Entity(profile) => Ok(UserResult::User(profile.into())),
            QueryOneResult::Messages(messages) => {
                Ok(UserResult::Err(EntityResult::new(messages)))
            }
        }
    }
}
