//! Palaver - discussion-forum backend
//!
//! Layers, leaves first: pure validators, sqlx repositories ([db]),
//! message-bearing services ([services]), GraphQL resolvers ([graphql]),
//! and the axum app ([app]) with its REST mirror ([api]).

pub mod api;
pub mod app;
pub mod config;
pub mod db;
pub mod graphql;
pub mod services;
