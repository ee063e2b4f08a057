// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Teams and role-tagged team memberships.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::ledger::serialize_millis;

/// Role an identity holds within one team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum TeamRole {
    Ldc,
    Ls,
    Gc,
    Ir,
}

impl TeamRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TeamRole::Ldc => "LDC",
            TeamRole::Ls => "LS",
            TeamRole::Gc => "GC",
            TeamRole::Ir => "IR",
        }
    }
}

impl std::fmt::Display for TeamRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A team with its live weekly counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub weekly_info_done: i64,
    pub weekly_plan_done: i64,
    pub weekly_info_target: i64,
    pub weekly_plan_target: i64,
    /// Start of the week the live counters belong to
    #[serde(serialize_with = "serialize_millis")]
    pub counters_week_start: i64,
}

/// Join row: an identity holding a role in a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Membership {
    pub id: i64,
    pub team_id: i64,
    pub ir_id: String,
    pub role: TeamRole,
}

/// Identity summary for role listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct RoleHolder {
    pub ir_id: String,
    pub ir_name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTeam {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RenameTeam {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TeamTargets {
    #[validate(range(min = 0, max = 10_000))]
    pub weekly_info_target: i64,
    #[validate(range(min = 0, max = 10_000))]
    pub weekly_plan_target: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AssignMembership {
    #[validate(length(min = 1, max = 18))]
    pub ir_id: String,
    pub team_id: i64,
    pub role: TeamRole,
}
