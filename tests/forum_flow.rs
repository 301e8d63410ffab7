//! Integration tests for the forum service layer
//!
//! These run against an in-memory SQLite database and cover the full
//! registration/login lifecycle, thread creation and retrieval, reply
//! handling, and vote tallying.

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;

use palaver::db::Database;
use palaver::services::{
    CategoryService, PointService, QueryArrayResult, QueryOneResult, SessionService,
    ThreadItemService, ThreadService, UserService,
};

const TEST_BCRYPT_COST: u32 = 4;

struct TestEnv {
    db: Database,
    users: UserService,
    threads: ThreadService,
    thread_items: ThreadItemService,
    categories: CategoryService,
    points: PointService,
    sessions: SessionService,
}

async fn env() -> TestEnv {
    let db = Database::connect_in_memory().await.unwrap();
    db.migrate().await.unwrap();
    TestEnv {
        users: UserService::new(db.clone(), TEST_BCRYPT_COST),
        threads: ThreadService::new(db.clone()),
        thread_items: ThreadItemService::new(db.clone()),
        categories: CategoryService::new(db.clone()),
        points: PointService::new(db.clone()),
        sessions: SessionService::new(db.clone(), 60),
        db,
    }
}

/// Register and confirm a user, returning their id
async fn confirmed_user(env: &TestEnv, email: &str, user_name: &str) -> String {
    let result = env
        .users
        .register(email, user_name, "Abcd1234!")
        .await
        .unwrap();
    let user = match result {
        QueryOneResult::Entity(u) => u,
        QueryOneResult::Messages(m) => panic!("register failed: {:?}", m),
    };
    env.users.confirm(email).await.unwrap();
    user.id
}

/// Id of one of the seeded categories
async fn seeded_category(env: &TestEnv) -> String {
    let categories = match env.categories.get_all_categories().await.unwrap() {
        QueryArrayResult::Entities(c) => c,
        QueryArrayResult::Messages(m) => panic!("category listing failed: {:?}", m),
    };
    assert!(!categories.is_empty(), "migrations should seed categories");
    categories[0].id.clone()
}

// ============================================================================
// Registration and Login
// ============================================================================

#[tokio::test]
async fn register_rejects_weak_password_before_any_write() {
    let env = env().await;

    // no uppercase character
    let result = env
        .users
        .register("a@b.com", "alice", "abcd1234!")
        .await
        .unwrap();
    assert_matches!(result, QueryOneResult::Messages(_));

    assert_eq!(env.db.users().count().await.unwrap(), 0);
}

#[tokio::test]
async fn register_rejects_bad_email() {
    let env = env().await;

    let result = env
        .users
        .register("not-an-email", "alice", "Abcd1234!")
        .await
        .unwrap();
    let messages = match result {
        QueryOneResult::Messages(m) => m,
        QueryOneResult::Entity(_) => panic!("expected rejection"),
    };
    assert_eq!(messages, vec!["Please enter valid email address".to_string()]);
    assert_eq!(env.db.users().count().await.unwrap(), 0);
}

#[tokio::test]
async fn register_blanks_password_and_normalizes_email() {
    let env = env().await;

    let result = env
        .users
        .register("  User@Example.COM ", "alice", "Abcd1234!")
        .await
        .unwrap();
    let user = match result {
        QueryOneResult::Entity(u) => u,
        QueryOneResult::Messages(m) => panic!("register failed: {:?}", m),
    };

    assert_eq!(user.password, "");
    assert_eq!(user.email, "user@example.com");
    assert!(!user.confirmed);

    // the stored row still carries the hash
    let stored = env.db.users().get_by_id(&user.id).await.unwrap().unwrap();
    assert!(stored.password.starts_with("$2"));
}

#[tokio::test]
async fn register_rejects_duplicate_user_name_and_email() {
    let env = env().await;
    confirmed_user(&env, "a@b.com", "alice").await;

    let dup_name = env
        .users
        .register("other@b.com", "alice", "Abcd1234!")
        .await
        .unwrap();
    assert_eq!(
        dup_name.messages(),
        Some(&["UserName already taken.".to_string()][..])
    );

    let dup_email = env
        .users
        .register("a@b.com", "bob", "Abcd1234!")
        .await
        .unwrap();
    assert_eq!(
        dup_email.messages(),
        Some(&["Email already registered.".to_string()][..])
    );
}

#[tokio::test]
async fn login_lifecycle_register_confirm_login() {
    let env = env().await;

    let result = env
        .users
        .register("a@b.com", "alice", "Abcd1234!")
        .await
        .unwrap();
    assert_matches!(result, QueryOneResult::Entity(_));

    // before confirmation
    let refused = env.users.login("alice", "Abcd1234!").await.unwrap();
    assert_eq!(
        refused.messages(),
        Some(&["User has not confirmed their registration email yet".to_string()][..])
    );

    env.users.confirm("a@b.com").await.unwrap();

    let accepted = env.users.login("alice", "Abcd1234!").await.unwrap();
    let user = match accepted {
        QueryOneResult::Entity(u) => u,
        QueryOneResult::Messages(m) => panic!("login failed: {:?}", m),
    };
    // password field is blanked on the returned user
    assert_eq!(user.password, "");
}

#[tokio::test]
async fn login_wrong_password_leaves_session_untouched() {
    let env = env().await;
    confirmed_user(&env, "a@b.com", "alice").await;

    let (session, created) = env.sessions.ensure(None).await.unwrap();
    assert!(created);

    let refused = env.users.login("alice", "WrongPass1!").await.unwrap();
    assert_eq!(
        refused.messages(),
        Some(&["Password is invalid".to_string()][..])
    );

    // no user was attached to the session
    let (reloaded, created) = env.sessions.ensure(Some(&session.id)).await.unwrap();
    assert!(!created);
    assert_eq!(reloaded.user_id, None);
}

#[tokio::test]
async fn login_unknown_user_names_the_user() {
    let env = env().await;
    let refused = env.users.login("ghost", "Abcd1234!").await.unwrap();
    assert_eq!(
        refused.messages(),
        Some(&["User with username ghost not found".to_string()][..])
    );
}

#[tokio::test]
async fn logout_reports_not_found_or_confirmation() {
    let env = env().await;
    confirmed_user(&env, "a@b.com", "alice").await;

    assert_eq!(env.users.logout("alice").await.unwrap(), "User logged off");
    assert_eq!(
        env.users.logout("ghost").await.unwrap(),
        "User with username ghost not found"
    );
}

// ============================================================================
// Threads
// ============================================================================

#[tokio::test]
async fn create_thread_rejects_bad_titles_without_writing() {
    let env = env().await;
    let user_id = confirmed_user(&env, "a@b.com", "alice").await;
    let category_id = seeded_category(&env).await;

    let body = "a perfectly reasonable thread body";

    let too_short = env
        .threads
        .create_thread(Some(&user_id), &category_id, "abcd", body)
        .await
        .unwrap();
    assert_eq!(
        too_short.messages(),
        Some(&["Title must be at least 5 characters.".to_string()][..])
    );

    let too_long = env
        .threads
        .create_thread(Some(&user_id), &category_id, &"t".repeat(151), body)
        .await
        .unwrap();
    assert_eq!(
        too_long.messages(),
        Some(&["Title cannot be greater than 150 characters.".to_string()][..])
    );

    assert_eq!(
        env.db.threads().count_by_category(&category_id).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn create_thread_body_bounds_are_independent_of_title_bounds() {
    let env = env().await;
    let user_id = confirmed_user(&env, "a@b.com", "alice").await;
    let category_id = seeded_category(&env).await;

    // 200-char body exceeds the title maximum but is valid for a body
    let result = env
        .threads
        .create_thread(Some(&user_id), &category_id, "A good title", &"b".repeat(200))
        .await
        .unwrap();
    assert_eq!(
        result.messages(),
        Some(&["Thread created successfully".to_string()][..])
    );

    let too_short_body = env
        .threads
        .create_thread(Some(&user_id), &category_id, "A good title", "short")
        .await
        .unwrap();
    assert_eq!(
        too_short_body.messages(),
        Some(&["Body must be at least 10 characters.".to_string()][..])
    );
}

#[tokio::test]
async fn create_thread_requires_login_and_category() {
    let env = env().await;
    let user_id = confirmed_user(&env, "a@b.com", "alice").await;
    let category_id = seeded_category(&env).await;

    let anonymous = env
        .threads
        .create_thread(None, &category_id, "A good title", "a sufficient body")
        .await
        .unwrap();
    assert_eq!(
        anonymous.messages(),
        Some(&["User is not logged in".to_string()][..])
    );

    let bad_category = env
        .threads
        .create_thread(Some(&user_id), "missing", "A good title", "a sufficient body")
        .await
        .unwrap();
    assert_eq!(
        bad_category.messages(),
        Some(&["Category not found".to_string()][..])
    );
}

#[tokio::test]
async fn created_thread_round_trips_through_get_by_id() {
    let env = env().await;
    let user_id = confirmed_user(&env, "a@b.com", "alice").await;
    let category_id = seeded_category(&env).await;

    let created = env
        .threads
        .create_thread(
            Some(&user_id),
            &category_id,
            "Round trip title",
            "round trip body text",
        )
        .await
        .unwrap();
    assert_eq!(
        created.messages(),
        Some(&["Thread created successfully".to_string()][..])
    );
    assert_eq!(
        env.db.threads().count_by_category(&category_id).await.unwrap(),
        1
    );

    let listed = env
        .threads
        .get_threads_by_category_id(&category_id)
        .await
        .unwrap()
        .entities()
        .unwrap();
    let thread_id = listed[0].thread.id.clone();

    let fetched = env.threads.get_thread_by_id(&thread_id).await.unwrap();
    let thread = match fetched {
        QueryOneResult::Entity(t) => t,
        QueryOneResult::Messages(m) => panic!("thread not found: {:?}", m),
    };
    assert_eq!(thread.title, "Round trip title");
    assert_eq!(thread.body, "round trip body text");
    assert_eq!(thread.user_id, user_id);
}

#[tokio::test]
async fn get_thread_by_id_miss_is_messages_not_error() {
    let env = env().await;
    let result = env.threads.get_thread_by_id("nope").await.unwrap();
    assert_eq!(result.messages(), Some(&["Thread not found".to_string()][..]));
}

#[tokio::test]
async fn category_listing_is_newest_first() {
    let env = env().await;
    let user_id = confirmed_user(&env, "a@b.com", "alice").await;
    let category_id = seeded_category(&env).await;

    for title in ["First thread", "Second thread", "Third thread"] {
        env.threads
            .create_thread(Some(&user_id), &category_id, title, "a sufficient body")
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let threads = env
        .threads
        .get_threads_by_category_id(&category_id)
        .await
        .unwrap()
        .entities()
        .unwrap();
    let titles: Vec<&str> = threads.iter().map(|t| t.thread.title.as_str()).collect();
    assert_eq!(titles, vec!["Third thread", "Second thread", "First thread"]);

    // joined category is attached
    assert_eq!(threads[0].category.id, category_id);
}

#[tokio::test]
async fn empty_category_listing_is_a_valid_empty_result() {
    let env = env().await;
    let category_id = seeded_category(&env).await;

    let result = env
        .threads
        .get_threads_by_category_id(&category_id)
        .await
        .unwrap();
    assert_eq!(result.messages(), None);
    assert!(result.entities().unwrap().is_empty());
}

#[tokio::test]
async fn latest_listing_spans_categories_newest_first() {
    let env = env().await;
    let user_id = confirmed_user(&env, "a@b.com", "alice").await;

    let categories = env
        .categories
        .get_all_categories()
        .await
        .unwrap()
        .entities()
        .unwrap();
    assert!(categories.len() >= 2);

    env.threads
        .create_thread(
            Some(&user_id),
            &categories[0].id,
            "Older thread",
            "a sufficient body",
        )
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    env.threads
        .create_thread(
            Some(&user_id),
            &categories[1].id,
            "Newer thread",
            "a sufficient body",
        )
        .await
        .unwrap();

    let latest = env
        .threads
        .get_threads_latest()
        .await
        .unwrap()
        .entities()
        .unwrap();
    assert_eq!(latest[0].thread.title, "Newer thread");
    assert_eq!(latest[1].thread.title, "Older thread");
}

// ============================================================================
// Thread items
// ============================================================================

#[tokio::test]
async fn thread_item_creation_and_listing() {
    let env = env().await;
    let user_id = confirmed_user(&env, "a@b.com", "alice").await;
    let category_id = seeded_category(&env).await;

    env.threads
        .create_thread(Some(&user_id), &category_id, "A good title", "a sufficient body")
        .await
        .unwrap();
    let thread_id = env
        .threads
        .get_threads_by_category_id(&category_id)
        .await
        .unwrap()
        .entities()
        .unwrap()[0]
        .thread
        .id
        .clone();

    let missing_thread = env
        .thread_items
        .create_thread_item(Some(&user_id), "nope", "a sufficient reply body")
        .await
        .unwrap();
    assert_eq!(
        missing_thread.messages(),
        Some(&["Thread not found".to_string()][..])
    );

    let created = env
        .thread_items
        .create_thread_item(Some(&user_id), &thread_id, "a sufficient reply body")
        .await
        .unwrap();
    assert_eq!(
        created.messages(),
        Some(&["ThreadItem created successfully".to_string()][..])
    );

    let items = env
        .thread_items
        .get_thread_items_by_thread_id(&thread_id)
        .await
        .unwrap()
        .entities()
        .unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].body, "a sufficient reply body");
}

// ============================================================================
// Points
// ============================================================================

#[tokio::test]
async fn votes_are_idempotent_and_flippable() {
    let env = env().await;
    let user_id = confirmed_user(&env, "a@b.com", "alice").await;
    let category_id = seeded_category(&env).await;

    env.threads
        .create_thread(Some(&user_id), &category_id, "A good title", "a sufficient body")
        .await
        .unwrap();
    let thread_id = env
        .threads
        .get_threads_by_category_id(&category_id)
        .await
        .unwrap()
        .entities()
        .unwrap()[0]
        .thread
        .id
        .clone();

    let points_of = |id: String| {
        let env_db = env.db.clone();
        async move { env_db.threads().get_by_id(&id).await.unwrap().unwrap().points }
    };

    // first up-vote
    let msg = env
        .points
        .update_thread_point(&user_id, &thread_id, true)
        .await
        .unwrap();
    assert_eq!(msg, "Successfully incremented points");
    assert_eq!(points_of(thread_id.clone()).await, 1);

    // duplicate up-vote is a no-op
    let msg = env
        .points
        .update_thread_point(&user_id, &thread_id, true)
        .await
        .unwrap();
    assert_eq!(msg, "You have already voted");
    assert_eq!(points_of(thread_id.clone()).await, 1);

    // flipping to a down-vote moves the counter by two
    let msg = env
        .points
        .update_thread_point(&user_id, &thread_id, false)
        .await
        .unwrap();
    assert_eq!(msg, "Successfully decremented points");
    assert_eq!(points_of(thread_id.clone()).await, -1);

    // a second voter is independent
    let other_id = confirmed_user(&env, "b@b.com", "bob").await;
    env.points
        .update_thread_point(&other_id, &thread_id, true)
        .await
        .unwrap();
    assert_eq!(points_of(thread_id.clone()).await, 0);
}

#[tokio::test]
async fn vote_on_missing_target_is_a_status_message() {
    let env = env().await;
    let user_id = confirmed_user(&env, "a@b.com", "alice").await;

    assert_eq!(
        env.points
            .update_thread_point(&user_id, "nope", true)
            .await
            .unwrap(),
        "Thread not found"
    );
    assert_eq!(
        env.points
            .update_thread_item_point(&user_id, "nope", true)
            .await
            .unwrap(),
        "ThreadItem not found"
    );
}

// ============================================================================
// Me / profile
// ============================================================================

#[tokio::test]
async fn me_loads_related_content_with_blank_password() {
    let env = env().await;
    let user_id = confirmed_user(&env, "a@b.com", "alice").await;
    let category_id = seeded_category(&env).await;

    env.threads
        .create_thread(Some(&user_id), &category_id, "A good title", "a sufficient body")
        .await
        .unwrap();
    let thread_id = env
        .threads
        .get_threads_by_category_id(&category_id)
        .await
        .unwrap()
        .entities()
        .unwrap()[0]
        .thread
        .id
        .clone();
    env.thread_items
        .create_thread_item(Some(&user_id), &thread_id, "a sufficient reply body")
        .await
        .unwrap();

    let profile = match env.users.me(&user_id).await.unwrap() {
        QueryOneResult::Entity(p) => p,
        QueryOneResult::Messages(m) => panic!("me failed: {:?}", m),
    };

    assert_eq!(profile.user.password, "");
    assert_eq!(profile.threads.len(), 1);
    assert_eq!(profile.threads[0].items.len(), 1);
    assert_eq!(profile.thread_items.len(), 1);
}

#[tokio::test]
async fn me_refuses_unknown_and_unconfirmed_users() {
    let env = env().await;

    let unknown = env.users.me("nope").await.unwrap();
    assert_eq!(unknown.messages(), Some(&["User not found".to_string()][..]));

    let result = env
        .users
        .register("a@b.com", "alice", "Abcd1234!")
        .await
        .unwrap();
    let user = result.entity().unwrap();
    let unconfirmed = env.users.me(&user.id).await.unwrap();
    assert_eq!(
        unconfirmed.messages(),
        Some(&["User has not confirmed their registration email yet".to_string()][..])
    );
}

// ============================================================================
// Sessions
// ============================================================================

#[tokio::test]
async fn session_lifecycle() {
    let env = env().await;
    let user_id = confirmed_user(&env, "a@b.com", "alice").await;

    let (session, created) = env.sessions.ensure(None).await.unwrap();
    assert!(created);
    assert_eq!(session.loaded_count, 0);

    // each load of an existing session bumps the counter
    let (session, created) = env.sessions.ensure(Some(&session.id)).await.unwrap();
    assert!(!created);
    assert_eq!(session.loaded_count, 1);

    env.sessions.attach_user(&session.id, &user_id).await.unwrap();
    let (session, _) = env.sessions.ensure(Some(&session.id)).await.unwrap();
    assert_eq!(session.user_id.as_deref(), Some(user_id.as_str()));

    assert!(env.sessions.destroy(&session.id).await.unwrap());
    let (fresh, created) = env.sessions.ensure(Some(&session.id)).await.unwrap();
    assert!(created);
    assert_ne!(fresh.id, session.id);
}

#[tokio::test]
async fn expired_sessions_are_not_resumed_and_get_swept() {
    let env = env().await;
    let expiring = SessionService::new(env.db.clone(), -1);

    let (session, _) = expiring.ensure(None).await.unwrap();

    // already past its expiry: a new session is created instead
    let (fresh, created) = expiring.ensure(Some(&session.id)).await.unwrap();
    assert!(created);
    assert_ne!(fresh.id, session.id);

    // both sessions were born expired
    let swept = expiring.sweep_expired().await.unwrap();
    assert_eq!(swept, 2);
}

// ============================================================================
// Persistence
// ============================================================================

#[tokio::test]
async fn file_backed_database_survives_reconnect() {
    let dir = tempfile::tempdir().unwrap();
    // the data directory does not exist yet; connect must create it
    let path = dir.path().join("data").join("forum.db");
    let path = path.to_str().unwrap();

    {
        let db = Database::connect(path).await.unwrap();
        db.migrate().await.unwrap();
        let users = UserService::new(db.clone(), TEST_BCRYPT_COST);
        users
            .register("a@b.com", "alice", "Abcd1234!")
            .await
            .unwrap()
            .entity()
            .expect("register");
    }

    let db = Database::connect(path).await.unwrap();
    // migrations are idempotent against existing data
    db.migrate().await.unwrap();
    let user = db.users().get_by_user_name("alice").await.unwrap();
    assert!(user.is_some());
}

// ============================================================================
// Top category threads
// ============================================================================

#[tokio::test]
async fn top_category_thread_ranks_active_categories() {
    let env = env().await;
    let user_id = confirmed_user(&env, "a@b.com", "alice").await;

    let categories = env
        .categories
        .get_all_categories()
        .await
        .unwrap()
        .entities()
        .unwrap();
    assert!(categories.len() >= 2);

    // two threads in the first category, one in the second
    for title in ["Busy one", "Busy two"] {
        env.threads
            .create_thread(Some(&user_id), &categories[0].id, title, "a sufficient body")
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    env.threads
        .create_thread(Some(&user_id), &categories[1].id, "Quiet one", "a sufficient body")
        .await
        .unwrap();

    let rows = env.categories.get_top_category_thread().await.unwrap();

    // busiest category first, its threads newest first
    assert_eq!(rows[0].category_id, categories[0].id);
    assert_eq!(rows[0].title, "Busy two");
    assert_eq!(rows[1].title, "Busy one");
    assert!(rows.iter().any(|r| r.category_id == categories[1].id));
}
