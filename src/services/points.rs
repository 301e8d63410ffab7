//! Point (vote) service
//!
//! The resolver layer checks authentication before calling in; the service
//! still guards on missing targets. Returns plain status strings, as the
//! point mutations always did.

use anyhow::Result;

use crate::db::{Database, VoteOutcome};

pub struct PointService {
    db: Database,
}

impl PointService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Up/down-vote a thread. `increment` false means a down-vote.
    pub async fn update_thread_point(
        &self,
        user_id: &str,
        thread_id: &str,
        increment: bool,
    ) -> Result<String> {
        if self.db.threads().get_by_id(thread_id).await?.is_none() {
            return Ok("Thread not found".to_string());
        }

        let outcome = self
            .db
            .points()
            .vote_thread(user_id, thread_id, !increment)
            .await?;
        Ok(outcome_message(outcome, increment))
    }

    /// Up/down-vote a thread item
    pub async fn update_thread_item_point(
        &self,
        user_id: &str,
        thread_item_id: &str,
        increment: bool,
    ) -> Result<String> {
        if self
            .db
            .thread_items()
            .get_by_id(thread_item_id)
            .await?
            .is_none()
        {
            return Ok("ThreadItem not found".to_string());
        }

        let outcome = self
            .db
            .points()
            .vote_thread_item(user_id, thread_item_id, !increment)
            .await?;
        Ok(outcome_message(outcome, increment))
    }
}

fn outcome_message(outcome: VoteOutcome, increment: bool) -> String {
    match outcome {
        VoteOutcome::Recorded | VoteOutcome::Flipped => {
            if increment {
                "Successfully incremented points".to_string()
            } else {
                "Successfully decremented points".to_string()
            }
        }
        VoteOutcome::Duplicate => "You have already voted".to_string(),
    }
}
