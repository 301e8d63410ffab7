//! Category queries

use std::sync::Arc;

use async_graphql::{Context, Object, Result};

use crate::services::{CategoryService, QueryArrayResult};

use super::super::types::{CategoryArray, CategoryArrayResult, CategoryThread, EntityResult};

#[derive(Default)]
pub struct CategoryQueries;

#[Object]
impl CategoryQueries {
    /// All categories ordered by name
    async fn get_all_categories(&self, ctx: &Context<'_>) -> Result<CategoryArrayResult> {
        let categories = ctx.data::<Arc<CategoryService>>().map_err(|e| {
            async_graphql::Error::new(format!("Category service unavailable: {:?}", e))
        })?;

        match categories.get_all_categories().await.map_err(|e| {
            tracing::error!(error = %e, "Category query failed");
            async_graphql::Error::new(e.to_string())
        })? {
            QueryArrayResult::Entities(rows) => {
                Ok(CategoryArrayResult::Categories(CategoryArray {
                    categories: rows.into_iter().map(Into::into).collect(),
                }))
            }
            QueryArrayResult::Messages(messages) => {
                Ok(CategoryArrayResult::Err(EntityResult::new(messages)))
            }
        }
    }

    /// Latest threads of the most active categories
    async fn get_top_category_thread(&self, ctx: &Context<'_>) -> Result<Vec<CategoryThread>> {
        let categories = ctx.data::<Arc<CategoryService>>().map_err(|e| {
            async_graphql::Error::new(format!("Category service unavailable: {:?}", e))
        })?;

        let rows = categories.get_top_category_thread().await.map_err(|e| {
            tracing::error!(error = %e, "Top category thread query failed");
            async_graphql::Error::new(e.to_string())
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
