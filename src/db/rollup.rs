// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weekly snapshot archival.

use super::Db;
use crate::error::AppError;
use crate::models::WeeklySnapshot;
use crate::time_utils::WEEK_MILLIS;

impl Db {
    pub async fn list_team_ids(&self) -> Result<Vec<i64>, AppError> {
        let ids = sqlx::query_scalar("SELECT id FROM teams ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }

    /// Archive one team's open week and move its counters to the week
    /// opened at `current_week_start`, atomically.
    ///
    /// The snapshot is keyed by the week the counters were collected for,
    /// which is the team's `counters_week_start`, not the caller's clock.
    /// Returns `false` without touching the team when it is already in
    /// `current_week_start` (or later), when it is gone, or when a snapshot
    /// for its open week exists. Re-running a rollup for the same boundary
    /// therefore cannot archive twice or wipe counts of the following week.
    ///
    /// The new week's counters are recounted from the ledgers, so entries
    /// recorded after the boundary but before this call are kept.
    pub async fn archive_team_week(
        &self,
        team_id: i64,
        current_week_start: i64,
        now: i64,
    ) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let open_week: Option<i64> =
            sqlx::query_scalar("SELECT counters_week_start FROM teams WHERE id = ?")
                .bind(team_id)
                .fetch_optional(&mut *tx)
                .await?;
        let week_start = match open_week {
            Some(week_start) if week_start < current_week_start => week_start,
            _ => {
                tx.rollback().await?;
                tracing::debug!(team_id, current_week_start, "Team gone or already rolled over");
                return Ok(false);
            }
        };

        // Snapshot and roll over in one write transaction so no entry lands between them.
        let inserted = sqlx::query(
            "INSERT INTO weekly_snapshots
                (team_id, week_start, archived_info_done, archived_plan_done, created_at)
             SELECT id, ?, weekly_info_done, weekly_plan_done, ?
             FROM teams WHERE id = ?
             ON CONFLICT (team_id, week_start) DO NOTHING",
        )
        .bind(week_start)
        .bind(now)
        .bind(team_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if inserted == 0 {
            tx.rollback().await?;
            tracing::debug!(team_id, week_start, "Week already archived");
            return Ok(false);
        }

        let week_end = current_week_start + WEEK_MILLIS;
        sqlx::query(
            "UPDATE teams SET
                weekly_info_done = (
                    SELECT COUNT(*) FROM info_details d
                    JOIN team_members m ON m.ir_id = d.ir_id
                    WHERE m.team_id = teams.id AND d.recorded_at >= ? AND d.recorded_at < ?),
                weekly_plan_done = (
                    SELECT COUNT(*) FROM plan_details d
                    JOIN team_members m ON m.ir_id = d.ir_id
                    WHERE m.team_id = teams.id AND d.recorded_at >= ? AND d.recorded_at < ?),
                counters_week_start = ?
             WHERE id = ?",
        )
        .bind(current_week_start)
        .bind(week_end)
        .bind(current_week_start)
        .bind(week_end)
        .bind(current_week_start)
        .bind(team_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(team_id, week_start, current_week_start, "Weekly snapshot archived");
        Ok(true)
    }

    /// Snapshots for a team, newest week first.
    pub async fn list_snapshots(&self, team_id: i64) -> Result<Vec<WeeklySnapshot>, AppError> {
        let snapshots = sqlx::query_as(
            "SELECT id, team_id, week_start, archived_info_done, archived_plan_done, created_at
             FROM weekly_snapshots WHERE team_id = ?
             ORDER BY week_start DESC",
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(snapshots)
    }
}
