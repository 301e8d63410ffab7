//! User service: registration, login, logout, profile
//!
//! Wraps [UsersRepository] with validation and bcrypt password hashing.
//! Session creation/destruction is the caller's responsibility; `login` and
//! `logout` only decide whether the credentials/user are acceptable.

use anyhow::Result;
use tracing::debug;

use crate::db::{CreateUser, Database, ThreadItemRecord, ThreadRecord, UserRecord};

use super::result::QueryOneResult;
use super::validators::{is_email_valid, is_password_valid};

const NOT_CONFIRMED: &str = "User has not confirmed their registration email yet";

/// A user's thread together with its replies, for the Me view
#[derive(Debug, Clone)]
pub struct ThreadWithItems {
    pub thread: ThreadRecord,
    pub items: Vec<ThreadItemRecord>,
}

/// Eagerly-loaded profile returned by [UserService::me]
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub user: UserRecord,
    pub threads: Vec<ThreadWithItems>,
    pub thread_items: Vec<ThreadItemRecord>,
}

pub struct UserService {
    db: Database,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(db: Database, bcrypt_cost: u32) -> Self {
        Self { db, bcrypt_cost }
    }

    /// Register a new (unconfirmed) user. Returns the created user with the
    /// password field blanked, or validation/conflict messages.
    pub async fn register(
        &self,
        email: &str,
        user_name: &str,
        password: &str,
    ) -> Result<QueryOneResult<UserRecord>> {
        let password_check = is_password_valid(password);
        if !password_check.is_valid {
            return Ok(QueryOneResult::message(
                "Passwords must be at least 8 characters long, and they must have \
                 1 upper case character, 1 number and symbol",
            ));
        }

        let trimmed_email = email.trim().to_lowercase();
        let email_error = is_email_valid(&trimmed_email);
        if !email_error.is_empty() {
            return Ok(QueryOneResult::message(email_error));
        }

        let users = self.db.users();
        if users.get_by_user_name(user_name).await?.is_some() {
            return Ok(QueryOneResult::message("UserName already taken."));
        }
        if users.get_by_email(&trimmed_email).await?.is_some() {
            return Ok(QueryOneResult::message("Email already registered."));
        }

        let hashed = bcrypt::hash(password, self.bcrypt_cost)?;
        let mut user = users
            .create(CreateUser {
                email: trimmed_email,
                user_name: user_name.to_string(),
                password: hashed,
            })
            .await?;

        debug!(user_id = %user.id, "User registered");
        user.password = String::new();
        Ok(QueryOneResult::Entity(user))
    }

    /// Authenticate by userName and password. Returns the user with the
    /// password field blanked, or a message explaining the refusal.
    pub async fn login(
        &self,
        user_name: &str,
        password: &str,
    ) -> Result<QueryOneResult<UserRecord>> {
        let user = match self.db.users().get_by_user_name(user_name).await? {
            Some(u) => u,
            None => return Ok(QueryOneResult::message(user_not_found(user_name))),
        };

        if !user.confirmed {
            return Ok(QueryOneResult::message(NOT_CONFIRMED));
        }

        if !bcrypt::verify(password, &user.password)? {
            return Ok(QueryOneResult::message("Password is invalid"));
        }

        debug!(user_id = %user.id, "User logged in");
        let mut user = user;
        user.password = String::new();
        Ok(QueryOneResult::Entity(user))
    }

    /// Produce the logout confirmation (or not-found) message. Does not
    /// mutate persisted state; the session layer destroys the session.
    pub async fn logout(&self, user_name: &str) -> Result<String> {
        match self.db.users().get_by_user_name(user_name).await? {
            Some(_) => Ok("User logged off".to_string()),
            None => Ok(user_not_found(user_name)),
        }
    }

    /// Load a user with related threads and thread items eagerly. Blanks the
    /// password before returning.
    pub async fn me(&self, id: &str) -> Result<QueryOneResult<UserProfile>> {
        let user = match self.db.users().get_by_id(id).await? {
            Some(u) => u,
            None => return Ok(QueryOneResult::message("User not found")),
        };

        if !user.confirmed {
            return Ok(QueryOneResult::message(NOT_CONFIRMED));
        }

        let thread_rows = self.db.threads().list_by_user(&user.id).await?;
        let mut threads = Vec::with_capacity(thread_rows.len());
        for thread in thread_rows {
            let items = self.db.thread_items().list_by_thread(&thread.id).await?;
            threads.push(ThreadWithItems { thread, items });
        }

        let thread_items = self.db.thread_items().list_by_user(&user.id).await?;

        let mut user = user;
        user.password = String::new();
        Ok(QueryOneResult::Entity(UserProfile {
            user,
            threads,
            thread_items,
        }))
    }

    /// Mark a user's registration email as confirmed. Stands in for the
    /// out-of-band confirmation step so the login lifecycle is completable.
    pub async fn confirm(&self, email: &str) -> Result<String> {
        if self.db.users().set_confirmed(email, true).await? {
            Ok("User confirmed".to_string())
        } else {
            Ok("User not found".to_string())
        }
    }
}

fn user_not_found(user_name: &str) -> String {
    format!("User with username {} not found", user_name)
}
