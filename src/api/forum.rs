//! REST forum endpoints (legacy mirror)
//!
//! Thread and reply creation take the user id from the session, as the
//! original routes did; listings render comma-separated plain text.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;

use crate::app::{load_session, AppState};
use crate::services::{QueryArrayResult, QueryOneResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateThreadRequest {
    pub category_id: String,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadsByCategoryRequest {
    pub category_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateThreadItemRequest {
    pub thread_id: String,
    pub body: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadItemsByThreadRequest {
    pub thread_id: String,
}

fn internal(e: anyhow::Error) -> Response {
    tracing::error!(error = %e, "REST handler failed");
    (StatusCode::INTERNAL_SERVER_ERROR, "An error has occurred").into_response()
}

fn first_message(messages: Vec<String>) -> String {
    messages
        .into_iter()
        .next()
        .unwrap_or_else(|| "An error has occurred".to_string())
}

async fn create_thread(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateThreadRequest>,
) -> Response {
    let (session, _) = match load_session(&state, &headers).await {
        Ok(s) => s,
        Err(e) => return internal(e),
    };

    match state
        .threads
        .create_thread(
            session.user_id.as_deref(),
            &req.category_id,
            &req.title,
            &req.body,
        )
        .await
    {
        Ok(QueryOneResult::Messages(messages)) => first_message(messages).into_response(),
        Ok(QueryOneResult::Entity(_)) => "Thread created successfully".into_response(),
        Err(e) => internal(e),
    }
}

async fn threads_by_category(
    State(state): State<AppState>,
    Json(req): Json<ThreadsByCategoryRequest>,
) -> Response {
    match state
        .threads
        .get_threads_by_category_id(&req.category_id)
        .await
    {
        Ok(QueryArrayResult::Entities(threads)) => threads
            .into_iter()
            .map(|t| t.thread.title)
            .collect::<Vec<_>>()
            .join(", ")
            .into_response(),
        Ok(QueryArrayResult::Messages(messages)) => first_message(messages).into_response(),
        Err(e) => internal(e),
    }
}

async fn create_thread_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateThreadItemRequest>,
) -> Response {
    let (session, _) = match load_session(&state, &headers).await {
        Ok(s) => s,
        Err(e) => return internal(e),
    };

    match state
        .thread_items
        .create_thread_item(session.user_id.as_deref(), &req.thread_id, &req.body)
        .await
    {
        Ok(QueryOneResult::Messages(messages)) => first_message(messages).into_response(),
        Ok(QueryOneResult::Entity(_)) => "ThreadItem created successfully".into_response(),
        Err(e) => internal(e),
    }
}

async fn thread_items_by_thread(
    State(state): State<AppState>,
    Json(req): Json<ThreadItemsByThreadRequest>,
) -> Response {
    match state
        .thread_items
        .get_thread_items_by_thread_id(&req.thread_id)
        .await
    {
        Ok(QueryArrayResult::Entities(items)) => items
            .into_iter()
            .map(|i| i.body)
            .collect::<Vec<_>>()
            .join(", ")
            .into_response(),
        Ok(QueryArrayResult::Messages(messages)) => first_message(messages).into_response(),
        Err(e) => internal(e),
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/createthread", post(create_thread))
        .route("/threadsbycategory", post(threads_by_category))
        .route("/createthreaditem", post(create_thread_item))
        .route("/threadsitemsbythread", post(thread_items_by_thread))
}
