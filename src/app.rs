//! Application state and HTTP router construction
//!
//! The GraphQL handler loads (or creates) the cookie session before
//! execution and injects it into the request data as
//! [SessionCtx](crate::graphql::SessionCtx); the REST handlers share the
//! same plumbing through [load_session].

use std::sync::Arc;

use anyhow::Result;
use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::extract::State;
use axum::http::{header::SET_COOKIE, HeaderMap};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::{Database, SessionRecord};
use crate::graphql::{PalaverSchema, SessionCtx};
use crate::services::{
    CategoryService, PointService, SessionService, ThreadItemService, ThreadService, UserService,
};

/// Shared state for HTTP handlers (GraphQL, API routes)
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Database,
    pub schema: PalaverSchema,
    pub users: Arc<UserService>,
    pub threads: Arc<ThreadService>,
    pub thread_items: Arc<ThreadItemService>,
    pub categories: Arc<CategoryService>,
    pub points: Arc<PointService>,
    pub sessions: Arc<SessionService>,
}

/// Extract the session id from the request's Cookie header
pub fn session_id_from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let cookies = headers.get(axum::http::header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == cookie_name).then(|| value.to_string())
    })
}

/// Set-Cookie value for a freshly created session
pub fn session_cookie(config: &Config, session_id: &str) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Strict; Max-Age={}",
        config.cookie_name, session_id, config.session_ttl_secs
    )
}

/// Set-Cookie value that expires the session cookie
pub fn clear_session_cookie(config: &Config) -> String {
    format!(
        "{}=; Path=/; HttpOnly; SameSite=Strict; Max-Age=0",
        config.cookie_name
    )
}

/// Load the request's session (creating one if the cookie is absent or
/// stale). Returns the session and whether it was newly created, in which
/// case the caller must emit the Set-Cookie header.
pub async fn load_session(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<(SessionRecord, bool)> {
    let session_id = session_id_from_headers(headers, &state.config.cookie_name);
    state.sessions.ensure(session_id.as_deref()).await
}

async fn graphiql(headers: HeaderMap) -> impl IntoResponse {
    let accepts_html = headers
        .get(axum::http::header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("text/html"))
        .unwrap_or(false);

    if accepts_html {
        axum::response::Html(GraphiQLSource::build().endpoint("/graphql").finish())
            .into_response()
    } else {
        (
            axum::http::StatusCode::METHOD_NOT_ALLOWED,
            axum::Json(serde_json::json!({
                "error": "GET requests are not supported for GraphQL queries. Use POST with Content-Type: application/json"
            })),
        )
            .into_response()
    }
}

async fn graphql_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> axum::response::Response {
    let (session, created) = match load_session(&state, &headers).await {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Session load failed");
            return (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                "An error has occurred",
            )
                .into_response();
        }
    };

    let request = req.into_inner().data(SessionCtx {
        id: session.id.clone(),
        user_id: session.user_id.clone(),
        loaded_count: session.loaded_count,
    });

    let response: GraphQLResponse = state.schema.execute(request).await.into();
    if created {
        let cookie = session_cookie(&state.config, &session.id);
        ([(SET_COOKIE, cookie)], response).into_response()
    } else {
        response.into_response()
    }
}

/// Build the full Axum router: /api, /graphql, layers. Returns Router<()>
/// (state fully applied) for use with axum::serve.
pub fn build_app(state: AppState) -> Router<()> {
    Router::new()
        .nest("/api", crate::api::router())
        .route("/graphql", get(graphiql).post(graphql_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
