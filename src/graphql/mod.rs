//! GraphQL API
//!
//! Queries and mutations over the forum services. Result unions replace the
//! original duck-typed dispatch: every fallible field resolves to either its
//! entity member or [types::EntityResult].

pub mod mutations;
pub mod queries;
mod schema;
pub mod session;
pub mod types;

pub use schema::{build_schema, PalaverSchema};
pub use session::{SessionCtx, SessionExt};
