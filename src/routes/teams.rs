// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Team and membership routes.

use crate::error::{AppError, Result};
use crate::models::team::{AssignMembership, CreateTeam, RenameTeam, TeamTargets};
use crate::models::{Membership, RoleHolder, Team, TeamRole, WeeklySnapshot};
use crate::time_utils;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/create_team", post(create_team))
        .route("/api/teams", get(list_teams))
        .route(
            "/api/teams/{team_id}",
            get(get_team).put(rename_team).delete(delete_team),
        )
        .route("/api/teams/{team_id}/targets", put(set_targets))
        .route("/api/teams/{team_id}/snapshots", get(list_snapshots))
        .route("/api/assign_ir_to_team", post(assign_ir_to_team))
        .route(
            "/api/teams/{team_id}/members/{ir_id}",
            delete(remove_member),
        )
        .route("/api/team_members/{team_id}", get(team_members))
        .route("/api/teams_by_ldc/{ir_id}", get(teams_by_ldc))
        .route("/api/ldcs", get(list_ldcs))
        .route("/api/members_by_role/{role}", get(members_by_role))
}

fn team_not_found(team_id: i64) -> AppError {
    AppError::NotFound(format!("Team {} not found", team_id))
}

// ─── Teams ───────────────────────────────────────────────────

#[derive(Serialize)]
pub struct CreateTeamResponse {
    pub message: String,
    pub team_id: i64,
    pub team_name: String,
}

async fn create_team(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateTeam>,
) -> Result<(StatusCode, Json<CreateTeamResponse>)> {
    payload.validate()?;
    let week_start = time_utils::week_start(&time_utils::now_local()).timestamp_millis();
    let team = state.db.create_team(&payload.name, week_start).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateTeamResponse {
            message: "Team created successfully".to_string(),
            team_id: team.id,
            team_name: team.name,
        }),
    ))
}

async fn list_teams(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Team>>> {
    Ok(Json(state.db.list_teams().await?))
}

async fn get_team(
    State(state): State<Arc<AppState>>,
    Path(team_id): Path<i64>,
) -> Result<Json<Team>> {
    let team = state
        .db
        .get_team(team_id)
        .await?
        .ok_or_else(|| team_not_found(team_id))?;
    Ok(Json(team))
}

#[derive(Serialize)]
pub struct RenameTeamResponse {
    pub message: String,
    pub old_name: String,
    pub new_name: String,
}

async fn rename_team(
    State(state): State<Arc<AppState>>,
    Path(team_id): Path<i64>,
    Json(payload): Json<RenameTeam>,
) -> Result<Json<RenameTeamResponse>> {
    payload.validate()?;
    let (old_name, new_name) = state.db.rename_team(team_id, &payload.name).await?;
    Ok(Json(RenameTeamResponse {
        message: "Team renamed successfully".to_string(),
        old_name,
        new_name,
    }))
}

#[derive(Serialize)]
pub struct DeleteTeamResponse {
    pub message: String,
    pub members_removed: u64,
}

async fn delete_team(
    State(state): State<Arc<AppState>>,
    Path(team_id): Path<i64>,
) -> Result<Json<DeleteTeamResponse>> {
    let members_removed = state.db.delete_team(team_id).await?;
    Ok(Json(DeleteTeamResponse {
        message: format!("Team {} deleted", team_id),
        members_removed,
    }))
}

async fn set_targets(
    State(state): State<Arc<AppState>>,
    Path(team_id): Path<i64>,
    Json(payload): Json<TeamTargets>,
) -> Result<Json<Team>> {
    payload.validate()?;
    let team = state
        .db
        .set_team_targets(
            team_id,
            payload.weekly_info_target,
            payload.weekly_plan_target,
        )
        .await?;
    Ok(Json(team))
}

async fn list_snapshots(
    State(state): State<Arc<AppState>>,
    Path(team_id): Path<i64>,
) -> Result<Json<Vec<WeeklySnapshot>>> {
    // History of a deleted team stays in storage but is not served.
    if state.db.get_team(team_id).await?.is_none() {
        return Err(team_not_found(team_id));
    }
    Ok(Json(state.db.list_snapshots(team_id).await?))
}

// ─── Memberships ─────────────────────────────────────────────

#[derive(Serialize)]
pub struct AssignResponse {
    pub message: String,
    pub membership: Membership,
}

async fn assign_ir_to_team(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AssignMembership>,
) -> Result<(StatusCode, Json<AssignResponse>)> {
    payload.validate()?;
    let membership = state
        .db
        .assign_membership(&payload.ir_id, payload.team_id, payload.role)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(AssignResponse {
            message: format!(
                "{} assigned to team {} as {}",
                membership.ir_id, membership.team_id, membership.role
            ),
            membership,
        }),
    ))
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

async fn remove_member(
    State(state): State<Arc<AppState>>,
    Path((team_id, ir_id)): Path<(i64, String)>,
) -> Result<Json<MessageResponse>> {
    state.db.remove_membership(team_id, &ir_id).await?;
    Ok(Json(MessageResponse {
        message: format!("{} removed from team {}", ir_id, team_id),
    }))
}

async fn team_members(
    State(state): State<Arc<AppState>>,
    Path(team_id): Path<i64>,
) -> Result<Json<Vec<Membership>>> {
    Ok(Json(state.db.list_members(team_id).await?))
}

fn default_role() -> TeamRole {
    TeamRole::Ldc
}

#[derive(Debug, Deserialize)]
pub struct RoleQuery {
    #[serde(default = "default_role")]
    pub role: TeamRole,
}

async fn teams_by_ldc(
    State(state): State<Arc<AppState>>,
    Path(ir_id): Path<String>,
    Query(query): Query<RoleQuery>,
) -> Result<Json<Vec<Team>>> {
    Ok(Json(
        state.db.list_teams_for_identity(&ir_id, query.role).await?,
    ))
}

async fn list_ldcs(State(state): State<Arc<AppState>>) -> Result<Json<Vec<RoleHolder>>> {
    Ok(Json(state.db.list_by_role(TeamRole::Ldc).await?))
}

async fn members_by_role(
    State(state): State<Arc<AppState>>,
    Path(role): Path<TeamRole>,
) -> Result<Json<Vec<RoleHolder>>> {
    Ok(Json(state.db.list_by_role(role).await?))
}
