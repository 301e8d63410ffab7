//! Integration tests for the REST mirror
//!
//! Drives the full axum router with in-process requests: the login flow
//! sets and clears the session cookie, and thread/reply creation takes the
//! user id from that cookie-backed session.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::json;
use tower::ServiceExt;

use palaver::app::{build_app, AppState};
use palaver::config::Config;
use palaver::db::Database;
use palaver::graphql::build_schema;
use palaver::services::{
    CategoryService, PointService, SessionService, ThreadItemService, ThreadService, UserService,
};

const TEST_BCRYPT_COST: u32 = 4;

fn test_config() -> Config {
    Config {
        host: None,
        port: 0,
        database_url: ":memory:".to_string(),
        cookie_name: "palaver.sid".to_string(),
        session_ttl_secs: 60,
        bcrypt_cost: TEST_BCRYPT_COST,
    }
}

struct TestApp {
    router: Router,
    db: Database,
}

async fn app() -> TestApp {
    let config = Arc::new(test_config());
    let db = Database::connect_in_memory().await.unwrap();
    db.migrate().await.unwrap();

    let users = Arc::new(UserService::new(db.clone(), config.bcrypt_cost));
    let threads = Arc::new(ThreadService::new(db.clone()));
    let thread_items = Arc::new(ThreadItemService::new(db.clone()));
    let categories = Arc::new(CategoryService::new(db.clone()));
    let points = Arc::new(PointService::new(db.clone()));
    let sessions = Arc::new(SessionService::new(db.clone(), config.session_ttl_secs));

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
        config,
        db: db.clone(),
        schema,
        users,
        threads,
        thread_items,
        categories,
        points,
        sessions,
    };

    TestApp {
        router: build_app(state),
        db,
    }
}

fn post_json(uri: &str, body: serde_json::Value, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

impl TestApp {
    async fn send(&self, req: Request<Body>) -> (StatusCode, Option<String>, String) {
        let response = self.router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, set_cookie, String::from_utf8(bytes.to_vec()).unwrap())
    }

    /// Register + confirm + login, returning the session cookie pair
    async fn logged_in_cookie(&self, email: &str, user_name: &str) -> String {
        let (status, _, body) = self
            .send(post_json(
                "/api/register",
                json!({ "email": email, "userName": user_name, "password": "Abcd1234!" }),
                None,
            ))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.starts_with("New user created! UserID: "), "{body}");

        let (status, _, body) = self
            .send(post_json("/api/confirm", json!({ "email": email }), None))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "User confirmed");

        let (status, set_cookie, body) = self
            .send(post_json(
                "/api/login",
                json!({ "userName": user_name, "password": "Abcd1234!" }),
                None,
            ))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.starts_with("User logged in! UserID: "), "{body}");

        let set_cookie = set_cookie.expect("login should set the session cookie");
        assert!(set_cookie.starts_with("palaver.sid="), "{set_cookie}");
        assert!(set_cookie.contains("HttpOnly"), "{set_cookie}");

        // the name=value pair the client would echo back
        set_cookie.split(';').next().unwrap().to_string()
    }

    async fn seeded_category(&self) -> String {
        self.db.categories().list_all().await.unwrap()[0].id.clone()
    }
}

#[tokio::test]
async fn health_endpoints_respond() {
    let app = app().await;

    let (status, _, body) = app
        .send(
            Request::builder()
                .uri("/api/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"healthy\""), "{body}");

    let (status, _, body) = app
        .send(
            Request::builder()
                .uri("/api/readyz")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"ready\":true"), "{body}");
}

#[tokio::test]
async fn login_rejections_pass_through_service_messages() {
    let app = app().await;

    let (status, set_cookie, body) = app
        .send(post_json(
            "/api/login",
            json!({ "userName": "ghost", "password": "Abcd1234!" }),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "User with username ghost not found");
    // no user attached, so no cookie committed
    assert_eq!(set_cookie, None);
}

#[tokio::test]
async fn create_thread_without_session_is_refused() {
    let app = app().await;
    let category_id = app.seeded_category().await;

    let (status, _, body) = app
        .send(post_json(
            "/api/createthread",
            json!({
                "categoryId": category_id,
                "title": "A good title",
                "body": "a sufficient body"
            }),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "User is not logged in");
    assert_eq!(
        app.db.threads().count_by_category(&category_id).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn session_cookie_carries_the_user_through_the_forum_routes() {
    let app = app().await;
    let cookie = app.logged_in_cookie("a@b.com", "alice").await;
    let category_id = app.seeded_category().await;

    // the thread's author comes from the session, not the request body
    let (status, _, body) = app
        .send(post_json(
            "/api/createthread",
            json!({
                "categoryId": category_id,
                "title": "A good title",
                "body": "a sufficient body"
            }),
            Some(&cookie),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Thread created successfully");

    let (_, _, body) = app
        .send(post_json(
            "/api/threadsbycategory",
            json!({ "categoryId": category_id }),
            None,
        ))
        .await;
    assert_eq!(body, "A good title");

    let thread_id = app
        .db
        .threads()
        .list_by_category(&category_id)
        .await
        .unwrap()[0]
        .thread
        .id
        .clone();

    let (_, _, body) = app
        .send(post_json(
            "/api/createthreaditem",
            json!({ "threadId": thread_id, "body": "a sufficient reply body" }),
            Some(&cookie),
        ))
        .await;
    assert_eq!(body, "ThreadItem created successfully");

    let (_, _, body) = app
        .send(post_json(
            "/api/threadsitemsbythread",
            json!({ "threadId": thread_id }),
            None,
        ))
        .await;
    assert_eq!(body, "a sufficient reply body");
}

#[tokio::test]
async fn logout_clears_the_cookie_and_ends_the_session() {
    let app = app().await;
    let cookie = app.logged_in_cookie("a@b.com", "alice").await;
    let category_id = app.seeded_category().await;

    let (status, set_cookie, body) = app
        .send(post_json(
            "/api/logout",
            json!({ "userName": "alice" }),
            Some(&cookie),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "User logged off");
    let set_cookie = set_cookie.expect("logout should clear the session cookie");
    assert!(set_cookie.contains("Max-Age=0"), "{set_cookie}");

    // the old cookie no longer names a live session
    let (_, _, body) = app
        .send(post_json(
            "/api/createthread",
            json!({
                "categoryId": category_id,
                "title": "A good title",
                "body": "a sufficient body"
            }),
            Some(&cookie),
        ))
        .await;
    assert_eq!(body, "User is not logged in");
}

#[tokio::test]
async fn register_rejections_pass_through_service_messages() {
    let app = app().await;

    let (status, _, body) = app
        .send(post_json(
            "/api/register",
            json!({ "email": "not-an-email", "userName": "alice", "password": "Abcd1234!" }),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Please enter valid email address");
}
