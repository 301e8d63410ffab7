//! Auth mutations: register, login, logout
//!
//! All three return plain status strings. `login` writes the user id into
//! the request's session; `logout` destroys the session row.

use std::sync::Arc;

use async_graphql::{Context, Object, Result};

use crate::services::{QueryOneResult, SessionService, UserService};

use super::super::session::SessionExt;

#[derive(Default)]
pub struct UserMutations;

#[Object]
impl UserMutations {
    /// Register a new user. Returns a status or the first validation message.
    async fn register(
        &self,
        ctx: &Context<'_>,
        email: String,
        user_name: String,
        password: String,
    ) -> Result<String> {
        let users = ctx.data::<Arc<UserService>>().map_err(|e| {
            async_graphql::Error::new(format!("User service unavailable: {:?}", e))
        })?;

        match users
            .register(&email, &user_name, &password)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Register failed");
                async_graphql::Error::new(e.to_string())
            })? {
            QueryOneResult::Entity(_) => Ok("Registration successful".to_string()),
            QueryOneResult::Messages(messages) => Ok(messages
                .into_iter()
                .next()
                .unwrap_or_else(|| "An error has occurred".to_string())),
        }
    }

    /// Authenticate and attach the user to the session
    async fn login(
        &self,
        ctx: &Context<'_>,
        user_name: String,
        password: String,
    ) -> Result<String> {
        let users = ctx.data::<Arc<UserService>>().map_err(|e| {
            async_graphql::Error::new(format!("User service unavailable: {:?}", e))
        })?;
        let sessions = ctx.data::<Arc<SessionService>>().map_err(|e| {
            async_graphql::Error::new(format!("Session service unavailable: {:?}", e))
        })?;
        let session = ctx.session()?.clone();

        match users.login(&user_name, &password).await.map_err(|e| {
            tracing::error!(error = %e, "Login failed");
            async_graphql::Error::new(e.to_string())
        })? {
            QueryOneResult::Entity(user) => {
                sessions
                    .attach_user(&session.id, &user.id)
                    .await
                    .map_err(|e| {
                        tracing::error!(error = %e, "Attaching user to session failed");
                        async_graphql::Error::new(e.to_string())
                    })?;
                Ok(format!("Login successful for userId {}", user.id))
            }
            QueryOneResult::Messages(messages) => Ok(messages
                .into_iter()
                .next()
                .unwrap_or_else(|| "An error has occurred".to_string())),
        }
    }

    /// Produce the logout message and destroy the session
    async fn logout(&self, ctx: &Context<'_>, user_name: String) -> Result<String> {
        let users = ctx.data::<Arc<UserService>>().map_err(|e| {
            async_graphql::Error::new(format!("User service unavailable: {:?}", e))
        })?;
        let sessions = ctx.data::<Arc<SessionService>>().map_err(|e| {
            async_graphql::Error::new(format!("Session service unavailable: {:?}", e))
        })?;
        let session = ctx.session()?.clone();

        let result = users.logout(&user_name).await.map_err(|e| {
            tracing::error!(error = %e, "Logout failed");
            async_graphql::Error::new(e.to_string())
        })?;

        if let Err(e) = sessions.destroy(&session.id).await {
            tracing::error!(error = %e, "Destroy session failed");
        }

        Ok(result)
    }
}
