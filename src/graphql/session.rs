//! Per-request session context for GraphQL operations
//!
//! The HTTP layer loads (or creates) the session row named by the cookie and
//! inserts a [SessionCtx] snapshot into the request data before execution.
//! Resolvers read it through [SessionExt]; mutations that change session
//! state go through [crate::services::SessionService].

use async_graphql::{Context, Result};

/// Snapshot of the server-side session attached to this request
#[derive(Debug, Clone)]
pub struct SessionCtx {
    pub id: String,
    pub user_id: Option<String>,
    pub loaded_count: i64,
}

impl SessionCtx {
    /// The authenticated user id, if a login happened on this session
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }
}

/// Extension trait to get the session from the GraphQL context
pub trait SessionExt {
    /// The request's session; every request carries one
    fn session(&self) -> Result<&SessionCtx>;
}

impl<'a> SessionExt for Context<'a> {
    fn session(&self) -> Result<&SessionCtx> {
        self.data_opt::<SessionCtx>()
            .ok_or_else(|| async_graphql::Error::new("Session unavailable"))
    }
}
