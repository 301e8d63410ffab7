//! GraphQL type definitions
//!
//! These types mirror the persistence records but are decorated with
//! async-graphql attributes. Result unions carry an explicit tag via
//! `#[derive(Union)]`: the "failure/informational" member is always
//! [EntityResult] with its list of human-readable messages.

use async_graphql::{SimpleObject, Union};
use serde::{Deserialize, Serialize};

use crate::db::{
    CategoryThreadRecord, ThreadCategoryRecord, ThreadItemRecord, ThreadRecord,
    ThreadWithCategory,
};
use crate::services::{ThreadWithItems, UserProfile};

/// Messages carried by the failure member of every result union
#[derive(Debug, Clone, SimpleObject, Serialize, Deserialize)]
pub struct EntityResult {
    pub messages: Vec<String>,
}

impl EntityResult {
    pub fn new(messages: Vec<String>) -> Self {
        Self { messages }
    }

    pub fn single(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
        }
    }
}

/// A discussion category
#[derive(Debug, Clone, SimpleObject, Serialize, Deserialize)]
pub struct ThreadCategory {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_on: String,
}

impl From<ThreadCategoryRecord> for ThreadCategory {
    fn from(r: ThreadCategoryRecord) -> Self {
        Self {
            id: r.id,
            name: r.name,
            description: r.description,
            created_on: r.created_on,
        }
    }
}

/// A reply within a thread
#[derive(Debug, Clone, SimpleObject, Serialize, Deserialize)]
pub struct ThreadItem {
    pub id: String,
    pub views: i64,
    pub is_disabled: bool,
    pub body: String,
    pub points: i64,
    pub created_on: String,
    pub user_id: String,
    pub thread_id: String,
}

impl From<ThreadItemRecord> for ThreadItem {
    fn from(r: ThreadItemRecord) -> Self {
        Self {
            id: r.id,
            views: r.views,
            is_disabled: r.is_disabled,
            body: r.body,
            points: r.points,
            created_on: r.created_on,
            user_id: r.user_id,
            thread_id: r.thread_id,
        }
    }
}

/// A top-level discussion post within a category
#[derive(Debug, Clone, SimpleObject, Serialize, Deserialize)]
pub struct Thread {
    pub id: String,
    pub views: i64,
    pub is_disabled: bool,
    pub title: String,
    pub body: String,
    pub points: i64,
    pub created_on: String,
    pub user_id: String,
    pub category_id: String,
    /// Present on category/latest listings, which join the category eagerly
    pub category: Option<ThreadCategory>,
    pub thread_items: Vec<ThreadItem>,
}

impl From<ThreadRecord> for Thread {
    fn from(r: ThreadRecord) -> Self {
        Self {
            id: r.id,
            views: r.views,
            is_disabled: r.is_disabled,
            title: r.title,
            body: r.body,
            points: r.points,
            created_on: r.created_on,
            user_id: r.user_id,
            category_id: r.category_id,
            category: None,
            thread_items: Vec::new(),
        }
    }
}

impl From<ThreadWithCategory> for Thread {
    fn from(r: ThreadWithCategory) -> Self {
        let mut thread = Thread::from(r.thread);
        thread.category = Some(r.category.into());
        thread
    }
}

impl From<ThreadWithItems> for Thread {
    fn from(r: ThreadWithItems) -> Self {
        let mut thread = Thread::from(r.thread);
        thread.thread_items = r.items.into_iter().map(Into::into).collect();
        thread
    }
}

/// A registered user with related content (password is always blank)
#[derive(Debug, Clone, SimpleObject, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub user_name: String,
    pub password: String,
    pub confirmed: bool,
    pub threads: Vec<Thread>,
    pub thread_items: Vec<ThreadItem>,
}

impl From<UserProfile> for User {
    fn from(p: UserProfile) -> Self {
        Self {
            id: p.user.id,
            email: p.user.email,
            user_name: p.user.user_name,
            password: p.user.password,
            confirmed: p.user.confirmed,
            threads: p.threads.into_iter().map(Into::into).collect(),
            thread_items: p.thread_items.into_iter().map(Into::into).collect(),
        }
    }
}

/// One row of the top-category-thread aggregate (query-only)
#[derive(Debug, Clone, SimpleObject, Serialize, Deserialize)]
pub struct CategoryThread {
    pub category_id: String,
    pub category_name: String,
    pub thread_id: String,
    pub title: String,
    pub title_created_on: String,
}

impl From<CategoryThreadRecord> for CategoryThread {
    fn from(r: CategoryThreadRecord) -> Self {
        Self {
            category_id: r.category_id,
            category_name: r.category_name,
            thread_id: r.thread_id,
            title: r.title,
            title_created_on: r.title_created_on,
        }
    }
}

/// Wrapper for thread listings (unions cannot carry bare lists)
#[derive(Debug, Clone, SimpleObject)]
pub struct ThreadArray {
    pub threads: Vec<Thread>,
}

#[derive(Debug, Clone, SimpleObject)]
pub struct ThreadItemArray {
    pub thread_items: Vec<ThreadItem>,
}

#[derive(Debug, Clone, SimpleObject)]
pub struct CategoryArray {
    pub categories: Vec<ThreadCategory>,
}

#[derive(Debug, Clone, Union)]
pub enum ThreadResult {
    Thread(Thread),
    Err(EntityResult),
}

#[derive(Debug, Clone, Union)]
pub enum ThreadArrayResult {
    Threads(ThreadArray),
    Err(EntityResult),
}

#[derive(Debug, Clone, Union)]
pub enum ThreadItemArrayResult {
    ThreadItems(ThreadItemArray),
    Err(EntityResult),
}

#[derive(Debug, Clone, Union)]
pub enum UserResult {
    User(User),
    Err(EntityResult),
}

#[derive(Debug, Clone, Union)]
pub enum CategoryArrayResult {
    Categories(CategoryArray),
    Err(EntityResult),
}
