//! GraphQL schema definition
//!
//! Query and mutation roots are merged from per-domain structs; services and
//! the database are injected as schema data.

use std::sync::Arc;

use async_graphql::{EmptySubscription, MergedObject, Schema};

use crate::db::Database;
use crate::services::{
    CategoryService, PointService, SessionService, ThreadItemService, ThreadService, UserService,
};

use super::mutations::{PointMutations, ThreadMutations, UserMutations};
use super::queries::{CategoryQueries, ThreadItemQueries, ThreadQueries, UserQueries};

#[derive(MergedObject, Default)]
pub struct QueryRoot(
    ThreadQueries,
    ThreadItemQueries,
    CategoryQueries,
    UserQueries,
);

#[derive(MergedObject, Default)]
pub struct MutationRoot(ThreadMutations, PointMutations, UserMutations);

/// The GraphQL schema type
pub type PalaverSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the GraphQL schema with all resolvers and service data
pub fn build_schema(
    db: Database,
    users: Arc<UserService>,
    threads: Arc<ThreadService>,
    thread_items: Arc<ThreadItemService>,
    categories: Arc<CategoryService>,
    points: Arc<PointService>,
    sessions: Arc<SessionService>,
) -> PalaverSchema {
    Schema::build(
        QueryRoot::default(),
        MutationRoot::default(),
        EmptySubscription,
    )
    .data(db)
    .data(users)
    .data(threads)
    .data(thread_items)
    .data(categories)
    .data(points)
    .data(sessions)
    .finish()
}
