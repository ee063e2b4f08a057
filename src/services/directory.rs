// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Two-phase identity registration and password authentication.

use crate::db::Db;
use crate::error::{AppError, Result};
use crate::models::identity::RegisterIdentity;
use crate::models::Identity;
use crate::services::password;
use crate::time_utils;
use validator::Validate;

/// Register an identity whose ID was reserved earlier.
///
/// The password is hashed before it reaches storage; the start date is today
/// in the reference timezone.
pub async fn register_identity(db: &Db, payload: RegisterIdentity) -> Result<Identity> {
    payload.validate()?;

    let plain = payload.ir_password.clone();
    let password_hash = tokio::task::spawn_blocking(move || password::hash_password(&plain))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Hashing task failed: {}", e)))?
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to hash password: {}", e)))?;

    db.register_identity(&payload, &password_hash, &time_utils::started_date_today())
        .await
}

/// Verify `password` for `ir_id` and return the identity without its hash.
pub async fn authenticate(db: &Db, ir_id: &str, password: &str) -> Result<Identity> {
    let credentials = db
        .get_credentials(ir_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("IR '{}' not found", ir_id)))?;

    let plain = password.to_string();
    let verified = tokio::task::spawn_blocking(move || {
        password::verify_password(&plain, &credentials.ir_password)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Verification task failed: {}", e)))?;

    if !verified {
        tracing::warn!(ir_id, "Login rejected: invalid credentials");
        return Err(AppError::Unauthorized);
    }

    let identity = db
        .get_identity(ir_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("IR '{}' not found", ir_id)))?;

    tracing::info!(ir_id, "Login successful");
    Ok(identity)
}
