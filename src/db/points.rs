//! Point (vote) repository
//!
//! Votes are recorded once per user per target (UNIQUE constraint); the
//! denormalized `points` counter on the target row moves in the same
//! transaction as the vote record, so concurrent votes cannot lose updates.

use anyhow::Result;
use sqlx::SqlitePool;

use super::sql_helpers::{new_id, now_iso8601};

/// What a vote attempt did to the stored state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    /// First vote by this user on this target
    Recorded,
    /// Existing vote in the opposite direction was flipped (counter moves by 2)
    Flipped,
    /// Same-direction vote already exists; nothing changed
    Duplicate,
}

pub struct PointsRepository {
    pool: SqlitePool,
}

impl PointsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Apply an up/down vote on a thread
    pub async fn vote_thread(
        &self,
        user_id: &str,
        thread_id: &str,
        is_decrement: bool,
    ) -> Result<VoteOutcome> {
        self.vote(
            "thread_points",
            "threads",
            "thread_id",
            user_id,
            thread_id,
            is_decrement,
        )
        .await
    }

    /// Apply an up/down vote on a thread item
    pub async fn vote_thread_item(
        &self,
        user_id: &str,
        thread_item_id: &str,
        is_decrement: bool,
    ) -> Result<VoteOutcome> {
        self.vote(
            "thread_item_points",
            "thread_items",
            "thread_item_id",
            user_id,
            thread_item_id,
            is_decrement,
        )
        .await
    }

    /// Vote record + counter update inside one transaction. The two vote
    /// tables are identical apart from names, so the SQL is templated.
    async fn vote(
        &self,
        points_table: &str,
        target_table: &str,
        target_column: &str,
        user_id: &str,
        target_id: &str,
        is_decrement: bool,
    ) -> Result<VoteOutcome> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, (String, i32)>(&format!(
            "SELECT id, is_decrement FROM {points_table} WHERE user_id = ? AND {target_column} = ?"
        ))
        .bind(user_id)
        .bind(target_id)
        .fetch_optional(&mut *tx)
        .await?;

        let outcome = match existing {
            None => {
                sqlx::query(&format!(
                    "INSERT INTO {points_table} (id, is_decrement, user_id, {target_column}, created_on) \
                     VALUES (?, ?, ?, ?, ?)"
                ))
                .bind(new_id())
                .bind(if is_decrement { 1 } else { 0 })
                .bind(user_id)
                .bind(target_id)
                .bind(now_iso8601())
                .execute(&mut *tx)
                .await?;

                let delta = if is_decrement { -1 } else { 1 };
                sqlx::query(&format!(
                    "UPDATE {target_table} SET points = points + ? WHERE id = ?"
                ))
                .bind(delta)
                .bind(target_id)
                .execute(&mut *tx)
                .await?;

                VoteOutcome::Recorded
            }
            Some((_, prev)) if (prev != 0) == is_decrement => VoteOutcome::Duplicate,
            Some((vote_id, _)) => {
                sqlx::query(&format!(
                    "UPDATE {points_table} SET is_decrement = ?, created_on = ? WHERE id = ?"
                ))
                .bind(if is_decrement { 1 } else { 0 })
                .bind(now_iso8601())
                .bind(&vote_id)
                .execute(&mut *tx)
                .await?;

                let delta = if is_decrement { -2 } else { 2 };
                sqlx::query(&format!(
                    "UPDATE {target_table} SET points = points + ? WHERE id = ?"
                ))
                .bind(delta)
                .bind(target_id)
                .execute(&mut *tx)
                .await?;

                VoteOutcome::Flipped
            }
        };

        tx.commit().await?;
        Ok(outcome)
    }
}
