//! API route definitions
//!
//! The primary API is GraphQL at /graphql. The REST endpoints mirror the
//! same operations with plain-text responses (legacy/parallel surface),
//! plus health checks.

pub mod auth;
pub mod forum;
pub mod health;

use axum::Router;

use crate::app::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(forum::router())
}
