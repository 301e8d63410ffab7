//! Palaver backend - discussion-forum service
//!
//! This is the main entry point. All operations are exposed via GraphQL at
//! /graphql, with a legacy REST mirror under /api.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use palaver::app::{self, AppState};
use palaver::config::Config;
use palaver::db::Database;
use palaver::graphql::build_schema;
use palaver::services::{
    CategoryService, PointService, SessionService, ThreadItemService, ThreadService, UserService,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(Config::from_env()?);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "palaver=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Palaver backend");

    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;
    tracing::info!("Database connected and migrated");

    let users = Arc::new(UserService::new(db.clone(), config.bcrypt_cost));
    let threads = Arc::new(ThreadService::new(db.clone()));
    let thread_items = Arc::new(ThreadItemService::new(db.clone()));
    let categories = Arc::new(CategoryService::new(db.clone()));
    let points = Arc::new(PointService::new(db.clone()));
    let sessions = Arc::new(SessionService::new(db.clone(), config.session_ttl_secs));

    let swept = sessions.sweep_expired().await?;
    if swept > 0 {
        tracing::info!(swept, "Removed expired sessions");
    }

    let schema = build_schema(
        db.clone(),
        users.clone(),
        threads.clone(),
        thread_items.clone(),
        categories.clone(),
        points.clone(),
        sessions.clone(),
    );

    let state = AppState {
        config: config.clone(),
        db,
        schema,
        users,
        threads,
        thread_items,
        categories,
        points,
        sessions,
    };

    let app = app::build_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(%addr, "GraphQL playground at /graphql");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
