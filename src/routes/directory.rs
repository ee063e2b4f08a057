// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity slot, registration and login routes.

use crate::error::{AppError, Result};
use crate::models::identity::{LoginRequest, RegisterIdentity, UpdateIdentity};
use crate::models::{Identity, IrSlot};
use crate::services::directory;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/add_ir_id", post(add_ir_id))
        .route("/api/get_all_ir", get(get_all_ir))
        .route("/api/ir/{ir_id}", get(get_single_ir))
        .route("/api/register_new_ir", post(register_new_ir))
        .route("/api/login", post(login))
        .route("/api/irs", get(get_all_registered_ir))
        .route("/api/irs/{ir_id}", get(get_ir).put(update_ir))
}

// ─── Slots ───────────────────────────────────────────────────

async fn add_ir_id(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<IrSlot>,
) -> Result<(StatusCode, Json<IrSlot>)> {
    payload.validate()?;
    let slot = state.db.reserve_slot(&payload.ir_id).await?;
    Ok((StatusCode::CREATED, Json(slot)))
}

async fn get_all_ir(State(state): State<Arc<AppState>>) -> Result<Json<Vec<IrSlot>>> {
    Ok(Json(state.db.list_slots().await?))
}

async fn get_single_ir(
    State(state): State<Arc<AppState>>,
    Path(ir_id): Path<String>,
) -> Result<Json<IrSlot>> {
    let slot = state
        .db
        .get_slot(&ir_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("IR ID '{}' not found", ir_id)))?;
    Ok(Json(slot))
}

// ─── Registration & Login ────────────────────────────────────

#[derive(Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub ir_id: String,
}

async fn register_new_ir(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterIdentity>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    let identity = directory::register_identity(&state.db, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "IR registered successfully".to_string(),
            ir_id: identity.ir_id,
        }),
    ))
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub ir: Identity,
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let identity = directory::authenticate(&state.db, &payload.ir_id, &payload.ir_password).await?;
    Ok(Json(LoginResponse {
        message: "Login Successful".to_string(),
        ir: identity,
    }))
}

// ─── Identities ──────────────────────────────────────────────

async fn get_all_registered_ir(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Identity>>> {
    Ok(Json(state.db.list_identities().await?))
}

async fn get_ir(
    State(state): State<Arc<AppState>>,
    Path(ir_id): Path<String>,
) -> Result<Json<Identity>> {
    let identity = state
        .db
        .get_identity(&ir_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("IR '{}' not found", ir_id)))?;
    Ok(Json(identity))
}

async fn update_ir(
    State(state): State<Arc<AppState>>,
    Path(ir_id): Path<String>,
    Json(payload): Json<UpdateIdentity>,
) -> Result<Json<Identity>> {
    payload.validate()?;
    Ok(Json(state.db.update_identity(&ir_id, &payload).await?))
}
