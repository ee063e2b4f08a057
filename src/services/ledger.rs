// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Request-to-storage preparation for the info/plan ledgers.

use chrono::{DateTime, FixedOffset, NaiveDate};
use validator::Validate;

use crate::db::{EntryInput, EntryPatch};
use crate::error::{AppError, Result};
use crate::models::ledger::{NewEntry, UpdateEntry};
use crate::models::{LedgerKind, Outcome};
use crate::time_utils;

/// Upper bound on entries accepted in one request.
pub const MAX_ENTRIES_PER_REQUEST: usize = 200;

fn check_outcome(kind: LedgerKind, outcome: Option<Outcome>, is_patch: bool) -> Result<()> {
    match (kind, outcome) {
        (LedgerKind::Info, None) if !is_patch => Err(AppError::Validation(
            "Info entries require an outcome (A, B or C)".to_string(),
        )),
        (LedgerKind::Plan, Some(_)) => Err(AppError::Validation(
            "Plan entries do not carry an outcome".to_string(),
        )),
        _ => Ok(()),
    }
}

fn parse_recorded_at(raw: &str) -> Result<i64> {
    time_utils::parse_rfc3339(raw)
        .map(|dt| dt.timestamp_millis())
        .ok_or_else(|| {
            AppError::Validation("Invalid 'recorded_at': must be RFC3339 datetime".to_string())
        })
}

/// Validate submitted entries and default missing timestamps to `now`.
pub fn prepare_entries(
    kind: LedgerKind,
    entries: Vec<NewEntry>,
    now: &DateTime<FixedOffset>,
) -> Result<Vec<EntryInput>> {
    if entries.is_empty() {
        return Err(AppError::Validation(
            "At least one entry is required".to_string(),
        ));
    }
    if entries.len() > MAX_ENTRIES_PER_REQUEST {
        return Err(AppError::Validation(format!(
            "At most {} entries per request",
            MAX_ENTRIES_PER_REQUEST
        )));
    }

    entries
        .into_iter()
        .map(|entry| -> Result<EntryInput> {
            entry.validate()?;
            check_outcome(kind, entry.outcome, false)?;
            let recorded_at = match entry.recorded_at.as_deref() {
                Some(raw) => parse_recorded_at(raw)?,
                None => now.timestamp_millis(),
            };
            Ok(EntryInput {
                recorded_at,
                outcome: entry.outcome,
                comment: entry.comment,
                subject_name: entry.subject_name,
            })
        })
        .collect()
}

/// Validate a partial update.
pub fn prepare_patch(kind: LedgerKind, update: UpdateEntry) -> Result<EntryPatch> {
    update.validate()?;
    check_outcome(kind, update.outcome, true)?;

    let recorded_at = update
        .recorded_at
        .as_deref()
        .map(parse_recorded_at)
        .transpose()?;

    Ok(EntryPatch {
        recorded_at,
        outcome: update.outcome,
        comment: update.comment,
        subject_name: update.subject_name,
    })
}

fn parse_bound(raw: Option<&str>, name: &str) -> Result<Option<NaiveDate>> {
    raw.filter(|s| !s.is_empty())
        .map(|s| {
            time_utils::parse_iso_date(s).ok_or_else(|| {
                AppError::Validation(format!("Invalid '{}': expected YYYY-MM-DD", name))
            })
        })
        .transpose()
}

/// Resolve optional ISO date bounds into an inclusive UTC millisecond range.
///
/// With no bounds the range is `today` (a local calendar day, not the rollup
/// week). A single missing bound is open-ended.
pub fn resolve_range(
    from_date: Option<&str>,
    to_date: Option<&str>,
    today: NaiveDate,
) -> Result<(i64, i64)> {
    let from = parse_bound(from_date, "from_date")?;
    let to = parse_bound(to_date, "to_date")?;

    let (start, end) = match (from, to) {
        (None, None) => (
            time_utils::local_day_start_millis(today),
            time_utils::local_day_end_millis(today),
        ),
        (from, to) => (
            from.map(time_utils::local_day_start_millis)
                .unwrap_or(i64::MIN),
            to.map(time_utils::local_day_end_millis).unwrap_or(i64::MAX),
        ),
    };

    if start > end {
        return Err(AppError::Validation(
            "'from_date' must not be after 'to_date'".to_string(),
        ));
    }
    Ok((start, end))
}
