//! Session service
//!
//! The explicit per-request session context: created on first contact (the
//! HTTP layer sets the cookie), attached to a user at login, destroyed at
//! logout. Backed by the sessions table with a TTL; `sweep_expired` stands
//! in for an external cache's eviction policy.

use anyhow::Result;
use tracing::debug;

use crate::db::{Database, SessionRecord};

pub struct SessionService {
    db: Database,
    ttl_secs: i64,
}

impl SessionService {
    pub fn new(db: Database, ttl_secs: i64) -> Self {
        Self { db, ttl_secs }
    }

    /// Load the session named by the cookie, or create a fresh one. The
    /// request-load counter is incremented on every load of an existing
    /// session. Returns the session and whether it was newly created.
    pub async fn ensure(&self, session_id: Option<&str>) -> Result<(SessionRecord, bool)> {
        if let Some(id) = session_id {
            if let Some(mut session) = self.db.sessions().get_live(id).await? {
                session.loaded_count = self.db.sessions().increment_loaded_count(id).await?;
                return Ok((session, false));
            }
        }

        let session = self.db.sessions().create(self.ttl_secs).await?;
        debug!(session_id = %session.id, "Session created");
        Ok((session, true))
    }

    /// Attach an authenticated user to the session (at login)
    pub async fn attach_user(&self, session_id: &str, user_id: &str) -> Result<()> {
        self.db.sessions().set_user(session_id, Some(user_id)).await
    }

    /// Destroy the session (at logout)
    pub async fn destroy(&self, session_id: &str) -> Result<bool> {
        let removed = self.db.sessions().delete(session_id).await?;
        if removed {
            debug!(session_id, "Session destroyed");
        }
        Ok(removed)
    }

    /// Remove expired sessions
    pub async fn sweep_expired(&self) -> Result<u64> {
        let swept = self.db.sessions().delete_expired().await?;
        if swept > 0 {
            debug!(swept, "Expired sessions removed");
        }
        Ok(swept)
    }
}
