// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Archived weekly team totals.

use serde::Serialize;

use crate::models::ledger::serialize_millis;

/// One team's done-counts for one closed rollup week. Never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct WeeklySnapshot {
    pub id: i64,
    pub team_id: i64,
    /// Friday 21:31 that opened the archived week
    #[serde(serialize_with = "serialize_millis")]
    pub week_start: i64,
    pub archived_info_done: i64,
    pub archived_plan_done: i64,
    #[serde(serialize_with = "serialize_millis")]
    pub created_at: i64,
}
