// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weekly rollup: archive every team's counters for the week they were
//! collected in, then move the team to the current week.
//!
//! Nothing here schedules itself. An external trigger calls
//! [`run_weekly_rollup`] after each Friday 21:31 boundary. Until it fires,
//! a team keeps counting only entries that fall in its open week; entries
//! for later weeks are picked up when the rollup recounts the new week.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::db::Db;
use crate::error::Result;
use crate::time_utils;

/// Outcome of one rollup run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RollupReport {
    /// Start of the archived week (RFC3339, reference timezone)
    pub week_start: String,
    /// Teams archived and reset by this run
    pub archived: Vec<i64>,
    /// Teams already rolled over to the current week
    pub skipped: Vec<i64>,
}

/// Archive each team's open week if it ended before the week containing `now`.
///
/// The report names the week that closed most recently. A team whose open
/// week is older (the trigger missed a boundary) is archived under its own
/// open week, and the weeks in between get no snapshot.
///
/// Safe to re-run for the same boundary: teams already archived are skipped
/// and their counters are left alone. Each team is handled in its own
/// transaction, so a failure partway leaves earlier teams archived and the
/// rest untouched; re-running finishes the job.
pub async fn run_weekly_rollup(db: &Db, now: &DateTime<FixedOffset>) -> Result<RollupReport> {
    let current_week = time_utils::week_start(now);
    let closed_week = time_utils::previous_week_start(now);
    let current_week_ms = current_week.timestamp_millis();
    let now_ms = now.timestamp_millis();

    let mut archived = Vec::new();
    let mut skipped = Vec::new();

    for team_id in db.list_team_ids().await? {
        if db.archive_team_week(team_id, current_week_ms, now_ms).await? {
            archived.push(team_id);
        } else {
            skipped.push(team_id);
        }
    }

    tracing::info!(
        week_start = %closed_week,
        archived = archived.len(),
        skipped = skipped.len(),
        "Weekly rollup complete"
    );

    Ok(RollupReport {
        week_start: time_utils::format_rfc3339(&closed_week),
        archived,
        skipped,
    })
}
