// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity slot and identity operations.

use super::Db;
use crate::error::AppError;
use crate::models::identity::{is_elevated_level, RegisterIdentity, UpdateIdentity};
use crate::models::{Credentials, Identity, IrSlot};
use sqlx::SqliteConnection;

/// Every identity column except the password hash.
const IDENTITY_COLUMNS: &str = "ir_id, ir_name, ir_email, ir_access_level, status, \
     plan_count, dr_count, info_count, name_list, started_date, \
     weekly_info_target, weekly_plan_target, weekly_uv_target";

async fn fetch_identity(
    conn: &mut SqliteConnection,
    ir_id: &str,
) -> Result<Option<Identity>, AppError> {
    let identity = sqlx::query_as(&format!(
        "SELECT {} FROM identities WHERE ir_id = ?",
        IDENTITY_COLUMNS
    ))
    .bind(ir_id)
    .fetch_optional(conn)
    .await?;
    Ok(identity)
}

impl Db {
    // ─── Slots ───────────────────────────────────────────────────

    /// Reserve an identity ID ahead of registration.
    pub async fn reserve_slot(&self, ir_id: &str) -> Result<IrSlot, AppError> {
        sqlx::query("INSERT INTO ir_slots (ir_id) VALUES (?)")
            .bind(ir_id)
            .execute(&self.pool)
            .await
            .map_err(|e| match AppError::from(e) {
                AppError::Conflict(_) => {
                    AppError::Conflict(format!("IR ID '{}' already exists", ir_id))
                }
                other => other,
            })?;

        tracing::info!(ir_id, "Reserved IR ID");
        Ok(IrSlot {
            ir_id: ir_id.to_string(),
        })
    }

    pub async fn list_slots(&self) -> Result<Vec<IrSlot>, AppError> {
        let slots = sqlx::query_as("SELECT ir_id FROM ir_slots ORDER BY ir_id")
            .fetch_all(&self.pool)
            .await?;
        Ok(slots)
    }

    pub async fn get_slot(&self, ir_id: &str) -> Result<Option<IrSlot>, AppError> {
        let slot = sqlx::query_as("SELECT ir_id FROM ir_slots WHERE ir_id = ?")
            .bind(ir_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(slot)
    }

    // ─── Identities ──────────────────────────────────────────────

    /// Register a full identity against a reserved slot.
    ///
    /// `password_hash` must already be hashed. The slot check and the insert
    /// share one transaction; the primary key on `identities` rejects a second
    /// registration even if two requests race past the slot check.
    pub async fn register_identity(
        &self,
        payload: &RegisterIdentity,
        password_hash: &str,
        started_date: &str,
    ) -> Result<Identity, AppError> {
        let mut tx = self.pool.begin().await?;

        let slot: Option<(String,)> = sqlx::query_as("SELECT ir_id FROM ir_slots WHERE ir_id = ?")
            .bind(&payload.ir_id)
            .fetch_optional(&mut *tx)
            .await?;
        if slot.is_none() {
            return Err(AppError::NotFound(format!(
                "IR ID '{}' not found",
                payload.ir_id
            )));
        }

        sqlx::query(
            "INSERT INTO identities (
                ir_id, ir_name, ir_email, ir_password, ir_access_level, started_date,
                weekly_info_target, weekly_plan_target, weekly_uv_target
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&payload.ir_id)
        .bind(&payload.ir_name)
        .bind(&payload.ir_email)
        .bind(password_hash)
        .bind(payload.ir_access_level)
        .bind(started_date)
        .bind(payload.weekly_info_target)
        .bind(payload.weekly_plan_target)
        .bind(payload.weekly_uv_target)
        .execute(&mut *tx)
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::Conflict(_) => {
                AppError::Conflict(format!("IR '{}' is already registered", payload.ir_id))
            }
            other => other,
        })?;

        let identity = fetch_identity(&mut tx, &payload.ir_id)
            .await?
            .ok_or_else(|| AppError::Database("Registered identity vanished".to_string()))?;

        tx.commit().await?;

        tracing::info!(ir_id = %payload.ir_id, "Registered IR");
        Ok(identity)
    }

    /// Stored credentials for password verification.
    pub async fn get_credentials(&self, ir_id: &str) -> Result<Option<Credentials>, AppError> {
        let credentials =
            sqlx::query_as("SELECT ir_id, ir_password FROM identities WHERE ir_id = ?")
                .bind(ir_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(credentials)
    }

    pub async fn get_identity(&self, ir_id: &str) -> Result<Option<Identity>, AppError> {
        let mut conn = self.pool.acquire().await?;
        fetch_identity(&mut conn, ir_id).await
    }

    pub async fn list_identities(&self) -> Result<Vec<Identity>, AppError> {
        let identities = sqlx::query_as(&format!(
            "SELECT {} FROM identities ORDER BY ir_id",
            IDENTITY_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(identities)
    }

    /// Apply a partial update to an identity.
    ///
    /// A UV target only exists on elevated identities: setting one on a base
    /// identity is rejected, and demoting an identity to base clears it.
    pub async fn update_identity(
        &self,
        ir_id: &str,
        update: &UpdateIdentity,
    ) -> Result<Identity, AppError> {
        let mut tx = self.pool.begin().await?;

        let current = fetch_identity(&mut tx, ir_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("IR '{}' not found", ir_id)))?;

        let access_level = update.ir_access_level.unwrap_or(current.ir_access_level);
        let uv_target = if is_elevated_level(access_level) {
            update.weekly_uv_target.or(current.weekly_uv_target)
        } else if update.weekly_uv_target.is_some() {
            return Err(AppError::Validation(
                "weekly_uv_target requires an elevated access level".to_string(),
            ));
        } else {
            None
        };

        sqlx::query(
            "UPDATE identities SET
                ir_name = COALESCE(?, ir_name),
                ir_email = COALESCE(?, ir_email),
                status = COALESCE(?, status),
                ir_access_level = ?,
                plan_count = COALESCE(?, plan_count),
                dr_count = COALESCE(?, dr_count),
                info_count = COALESCE(?, info_count),
                name_list = COALESCE(?, name_list),
                weekly_info_target = COALESCE(?, weekly_info_target),
                weekly_plan_target = COALESCE(?, weekly_plan_target),
                weekly_uv_target = ?
             WHERE ir_id = ?",
        )
        .bind(&update.ir_name)
        .bind(&update.ir_email)
        .bind(update.status)
        .bind(access_level)
        .bind(update.plan_count)
        .bind(update.dr_count)
        .bind(update.info_count)
        .bind(update.name_list)
        .bind(update.weekly_info_target)
        .bind(update.weekly_plan_target)
        .bind(uv_target)
        .bind(ir_id)
        .execute(&mut *tx)
        .await?;

        let updated = fetch_identity(&mut tx, ir_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("IR '{}' not found", ir_id)))?;

        tx.commit().await?;

        tracing::info!(ir_id, "Updated IR details");
        Ok(updated)
    }
}
