// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Info/plan ledger operations.
//!
//! Table and counter names come from `LedgerKind`, never from user input.

use super::Db;
use crate::error::AppError;
use crate::models::{LedgerEntry, LedgerKind, Outcome};
use crate::time_utils::WEEK_MILLIS;

/// A validated entry ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInput {
    /// UTC milliseconds
    pub recorded_at: i64,
    pub outcome: Option<Outcome>,
    pub comment: String,
    pub subject_name: String,
}

/// A validated partial update. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPatch {
    pub recorded_at: Option<i64>,
    pub outcome: Option<Outcome>,
    pub comment: Option<String>,
    pub subject_name: Option<String>,
}

const ENTRY_COLUMNS: &str = "id, ir_id, recorded_at, outcome, comment, subject_name";

impl Db {
    /// Insert entries for `ir_id`, returning their generated IDs in order.
    ///
    /// Each entry commits on its own together with the counter bumps it
    /// causes: the owner's lifetime counter always, and the weekly counter of
    /// every team the owner belongs to whose open week contains `recorded_at`.
    /// A team's open week only moves when the rollup archives it, so an entry
    /// is never credited to a week by wall-clock time.
    pub async fn add_entries(
        &self,
        kind: LedgerKind,
        ir_id: &str,
        entries: &[EntryInput],
    ) -> Result<Vec<i64>, AppError> {
        let owner: Option<(String,)> = sqlx::query_as("SELECT ir_id FROM identities WHERE ir_id = ?")
            .bind(ir_id)
            .fetch_optional(&self.pool)
            .await?;
        if owner.is_none() {
            return Err(AppError::NotFound(format!("IR '{}' not found", ir_id)));
        }

        let insert_sql = format!(
            "INSERT INTO {} (ir_id, recorded_at, outcome, comment, subject_name)
             VALUES (?, ?, ?, ?, ?) RETURNING id",
            kind.table()
        );
        let identity_sql = format!(
            "UPDATE identities SET {counter} = {counter} + 1 WHERE ir_id = ?",
            counter = kind.identity_counter()
        );
        let teams_sql = format!(
            "UPDATE teams SET {counter} = {counter} + 1
             WHERE id IN (SELECT team_id FROM team_members WHERE ir_id = ?)
               AND ? >= counters_week_start
               AND ? < counters_week_start + ?",
            counter = kind.team_counter()
        );

        let mut ids = Vec::with_capacity(entries.len());
        for entry in entries {
            let mut tx = self.pool.begin().await?;

            let id: i64 = sqlx::query_scalar(&insert_sql)
                .bind(ir_id)
                .bind(entry.recorded_at)
                .bind(entry.outcome)
                .bind(&entry.comment)
                .bind(&entry.subject_name)
                .fetch_one(&mut *tx)
                .await?;

            sqlx::query(&identity_sql)
                .bind(ir_id)
                .execute(&mut *tx)
                .await?;

            sqlx::query(&teams_sql)
                .bind(ir_id)
                .bind(entry.recorded_at)
                .bind(entry.recorded_at)
                .bind(WEEK_MILLIS)
                .execute(&mut *tx)
                .await?;

            tx.commit().await?;
            ids.push(id);
        }

        tracing::info!(
            ir_id,
            kind = kind.label(),
            count = ids.len(),
            "Ledger entries added"
        );
        Ok(ids)
    }

    /// Entries for `ir_id` with `from <= recorded_at <= to` (UTC millis).
    pub async fn query_entries(
        &self,
        kind: LedgerKind,
        ir_id: &str,
        from: i64,
        to: i64,
    ) -> Result<Vec<LedgerEntry>, AppError> {
        let owner: Option<(String,)> = sqlx::query_as("SELECT ir_id FROM identities WHERE ir_id = ?")
            .bind(ir_id)
            .fetch_optional(&self.pool)
            .await?;
        if owner.is_none() {
            return Err(AppError::NotFound(format!("IR '{}' not found", ir_id)));
        }

        let entries = sqlx::query_as(&format!(
            "SELECT {} FROM {}
             WHERE ir_id = ? AND recorded_at BETWEEN ? AND ?
             ORDER BY id",
            ENTRY_COLUMNS,
            kind.table()
        ))
        .bind(ir_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    pub async fn get_entry(
        &self,
        kind: LedgerKind,
        entry_id: i64,
    ) -> Result<Option<LedgerEntry>, AppError> {
        let entry = sqlx::query_as(&format!(
            "SELECT {} FROM {} WHERE id = ?",
            ENTRY_COLUMNS,
            kind.table()
        ))
        .bind(entry_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entry)
    }

    pub async fn update_entry(
        &self,
        kind: LedgerKind,
        entry_id: i64,
        patch: &EntryPatch,
    ) -> Result<LedgerEntry, AppError> {
        let entry: LedgerEntry = sqlx::query_as(&format!(
            "UPDATE {} SET
                recorded_at = COALESCE(?, recorded_at),
                outcome = COALESCE(?, outcome),
                comment = COALESCE(?, comment),
                subject_name = COALESCE(?, subject_name)
             WHERE id = ?
             RETURNING {}",
            kind.table(),
            ENTRY_COLUMNS
        ))
        .bind(patch.recorded_at)
        .bind(patch.outcome)
        .bind(&patch.comment)
        .bind(&patch.subject_name)
        .bind(entry_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| entry_not_found(kind, entry_id))?;

        tracing::info!(entry_id, kind = kind.label(), "Ledger entry updated");
        Ok(entry)
    }

    pub async fn delete_entry(&self, kind: LedgerKind, entry_id: i64) -> Result<(), AppError> {
        let removed = sqlx::query(&format!("DELETE FROM {} WHERE id = ?", kind.table()))
            .bind(entry_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if removed == 0 {
            return Err(entry_not_found(kind, entry_id));
        }

        tracing::info!(entry_id, kind = kind.label(), "Ledger entry deleted");
        Ok(())
    }
}

fn entry_not_found(kind: LedgerKind, entry_id: i64) -> AppError {
    AppError::NotFound(format!("{} {} not found", kind.label(), entry_id))
}
