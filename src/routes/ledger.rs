// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Info and plan ledger routes.
//!
//! Both ledgers share handlers; the router for each one carries its
//! `LedgerKind` as a request extension.

use crate::error::{AppError, Result};
use crate::models::ledger::{NewEntry, OneOrMany, UpdateEntry};
use crate::models::{LedgerEntry, LedgerKind};
use crate::services::ledger;
use crate::time_utils;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(kind_routes(LedgerKind::Info, "info_details"))
        .merge(kind_routes(LedgerKind::Plan, "plan_details"))
}

fn kind_routes(kind: LedgerKind, segment: &str) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("/api/irs/{{ir_id}}/{}", segment),
            post(add_entries).get(query_entries),
        )
        .route(
            &format!("/api/{}/{{entry_id}}", segment),
            get(get_entry).put(update_entry).delete(delete_entry),
        )
        .layer(Extension(kind))
}

#[derive(Serialize)]
pub struct AddEntriesResponse {
    pub message: String,
    pub ids: Vec<i64>,
}

async fn add_entries(
    State(state): State<Arc<AppState>>,
    Extension(kind): Extension<LedgerKind>,
    Path(ir_id): Path<String>,
    Json(body): Json<OneOrMany<NewEntry>>,
) -> Result<(StatusCode, Json<AddEntriesResponse>)> {
    let now = time_utils::now_local();
    let entries = ledger::prepare_entries(kind, body.into_vec(), &now)?;

    let ids = state.db.add_entries(kind, &ir_id, &entries).await?;

    Ok((
        StatusCode::CREATED,
        Json(AddEntriesResponse {
            message: format!("{} {} entries added", ids.len(), kind.label()),
            ids,
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct DateRange {
    pub from_date: Option<String>,
    pub to_date: Option<String>,
}

async fn query_entries(
    State(state): State<Arc<AppState>>,
    Extension(kind): Extension<LedgerKind>,
    Path(ir_id): Path<String>,
    Query(range): Query<DateRange>,
) -> Result<Json<Vec<LedgerEntry>>> {
    let (from, to) = ledger::resolve_range(
        range.from_date.as_deref(),
        range.to_date.as_deref(),
        time_utils::today_local(),
    )?;
    Ok(Json(state.db.query_entries(kind, &ir_id, from, to).await?))
}

async fn get_entry(
    State(state): State<Arc<AppState>>,
    Extension(kind): Extension<LedgerKind>,
    Path(entry_id): Path<i64>,
) -> Result<Json<LedgerEntry>> {
    let entry = state
        .db
        .get_entry(kind, entry_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{} {} not found", kind.label(), entry_id)))?;
    Ok(Json(entry))
}

async fn update_entry(
    State(state): State<Arc<AppState>>,
    Extension(kind): Extension<LedgerKind>,
    Path(entry_id): Path<i64>,
    Json(payload): Json<UpdateEntry>,
) -> Result<Json<LedgerEntry>> {
    let patch = ledger::prepare_patch(kind, payload)?;
    Ok(Json(state.db.update_entry(kind, entry_id, &patch).await?))
}

async fn delete_entry(
    State(state): State<Arc<AppState>>,
    Extension(kind): Extension<LedgerKind>,
    Path(entry_id): Path<i64>,
) -> Result<StatusCode> {
    state.db.delete_entry(kind, entry_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
