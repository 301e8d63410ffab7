//! REST auth endpoints (legacy mirror of the GraphQL mutations)
//!
//! Plain-text responses, same services. `login` sets the session cookie;
//! `logout` clears it.

use axum::extract::State;
use axum::http::{header::SET_COOKIE, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;

use crate::app::{clear_session_cookie, load_session, session_cookie, AppState};
use crate::services::QueryOneResult;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub user_name: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub user_name: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    pub user_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmRequest {
    pub email: String,
}

fn internal(e: anyhow::Error) -> Response {
    tracing::error!(error = %e, "REST handler failed");
    (StatusCode::INTERNAL_SERVER_ERROR, "An error has occurred").into_response()
}

async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Response {
    match state
        .users
        .register(&req.email, &req.user_name, &req.password)
        .await
    {
        Ok(QueryOneResult::Entity(user)) => {
            format!("New user created! UserID: {}", user.id).into_response()
        }
        Ok(QueryOneResult::Messages(messages)) => messages
            .into_iter()
            .next()
            .unwrap_or_else(|| "An error has occurred".to_string())
            .into_response(),
        Err(e) => internal(e),
    }
}

async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> Response {
    let (session, created) = match load_session(&state, &headers).await {
        Ok(s) => s,
        Err(e) => return internal(e),
    };

    match state.users.login(&req.user_name, &req.password).await {
        Ok(QueryOneResult::Entity(user)) => {
            if let Err(e) = state.sessions.attach_user(&session.id, &user.id).await {
                return internal(e);
            }
            let body = format!("User logged in! UserID: {}", user.id);
            if created {
                let cookie = session_cookie(&state.config, &session.id);
                ([(SET_COOKIE, cookie)], body).into_response()
            } else {
                body.into_response()
            }
        }
        Ok(QueryOneResult::Messages(messages)) => messages
            .into_iter()
            .next()
            .unwrap_or_else(|| "An error has occurred".to_string())
            .into_response(),
        Err(e) => internal(e),
    }
}

async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<LogoutRequest>,
) -> Response {
    let (session, _) = match load_session(&state, &headers).await {
        Ok(s) => s,
        Err(e) => return internal(e),
    };

    let message = match state.users.logout(&req.user_name).await {
        Ok(m) => m,
        Err(e) => return internal(e),
    };

    if let Err(e) = state.sessions.destroy(&session.id).await {
        tracing::error!(error = %e, "Destroy session failed");
    }

    let cookie = clear_session_cookie(&state.config);
    ([(SET_COOKIE, cookie)], message).into_response()
}

async fn confirm(
    State(state): State<AppState>,
    Json(req): Json<ConfirmRequest>,
) -> Response {
    match state.users.confirm(&req.email).await {
        Ok(message) => message.into_response(),
        Err(e) => internal(e),
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/confirm", post(confirm))
}
