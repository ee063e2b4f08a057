// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Week-boundary lookup and administrative routes.

use crate::error::{AppError, Result};
use crate::middleware::require_admin;
use crate::services::{run_weekly_rollup, RollupReport};
use crate::time_utils;
use crate::AppState;
use axum::{
    extract::{Query, State},
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Public routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/week_start", get(week_start))
}

/// Routes gated by the admin token.
pub fn admin_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/rollup", post(rollup))
        .route("/admin/reset_db", post(reset_db))
        .route_layer(middleware::from_fn_with_state(state, require_admin))
}

#[derive(Debug, Deserialize)]
pub struct WeekStartQuery {
    /// RFC3339 instant; defaults to now
    pub at: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WeekStartResponse {
    pub at: String,
    pub week_start: String,
}

async fn week_start(Query(query): Query<WeekStartQuery>) -> Result<Json<WeekStartResponse>> {
    let at = match query.at.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => time_utils::parse_rfc3339(raw).ok_or_else(|| {
            AppError::Validation("Invalid 'at': must be RFC3339 datetime".to_string())
        })?,
        None => time_utils::now_local(),
    };

    Ok(Json(WeekStartResponse {
        at: time_utils::format_rfc3339(&at),
        week_start: time_utils::format_rfc3339(&time_utils::week_start(&at)),
    }))
}

async fn rollup(State(state): State<Arc<AppState>>) -> Result<Json<RollupReport>> {
    let report = run_weekly_rollup(&state.db, &time_utils::now_local()).await?;
    Ok(Json(report))
}

#[derive(Serialize)]
pub struct ResetResponse {
    pub message: String,
}

async fn reset_db(State(state): State<Arc<AppState>>) -> Result<Json<ResetResponse>> {
    state.db.reset_all().await?;
    Ok(Json(ResetResponse {
        message: "Database reset successfully".to_string(),
    }))
}
