// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Activity ledger entries ("info details" and "plan details").

use serde::{Deserialize, Serialize, Serializer};
use validator::Validate;

/// Outcome recorded on an info entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum Outcome {
    A,
    B,
    C,
}

/// Which ledger an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerKind {
    /// Completed actions; carries an outcome
    Info,
    /// Planned actions; no outcome
    Plan,
}

impl LedgerKind {
    pub fn table(&self) -> &'static str {
        match self {
            LedgerKind::Info => "info_details",
            LedgerKind::Plan => "plan_details",
        }
    }

    /// Identity counter bumped when an entry is added.
    pub fn identity_counter(&self) -> &'static str {
        match self {
            LedgerKind::Info => "info_count",
            LedgerKind::Plan => "plan_count",
        }
    }

    /// Team weekly counter bumped when an entry is added.
    pub fn team_counter(&self) -> &'static str {
        match self {
            LedgerKind::Info => "weekly_info_done",
            LedgerKind::Plan => "weekly_plan_done",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LedgerKind::Info => "info detail",
            LedgerKind::Plan => "plan detail",
        }
    }
}

/// A stored ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct LedgerEntry {
    pub id: i64,
    pub ir_id: String,
    /// UTC milliseconds; serialized as RFC3339 in the reference timezone
    #[serde(serialize_with = "serialize_millis")]
    pub recorded_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    pub comment: String,
    pub subject_name: String,
}

pub(crate) fn serialize_millis<S: Serializer>(millis: &i64, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&crate::time_utils::format_millis(*millis))
}

/// New entry as submitted by a client.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewEntry {
    /// RFC3339; defaults to now
    pub recorded_at: Option<String>,
    pub outcome: Option<Outcome>,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub comment: String,
    #[validate(length(min = 1, max = 100))]
    pub subject_name: String,
}

/// Partial entry update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateEntry {
    pub recorded_at: Option<String>,
    pub outcome: Option<Outcome>,
    #[validate(length(max = 500))]
    pub comment: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub subject_name: Option<String>,
}

/// Request body that is either one entry or a list of entries.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}
