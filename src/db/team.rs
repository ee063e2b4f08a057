// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Team and membership operations.

use super::Db;
use crate::error::AppError;
use crate::models::{Membership, RoleHolder, Team, TeamRole};
use sqlx::SqliteConnection;

const TEAM_COLUMNS: &str = "id, name, weekly_info_done, weekly_plan_done, \
     weekly_info_target, weekly_plan_target, counters_week_start";

async fn team_exists(conn: &mut SqliteConnection, team_id: i64) -> Result<bool, AppError> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM teams WHERE id = ?")
        .bind(team_id)
        .fetch_optional(conn)
        .await?;
    Ok(row.is_some())
}

fn team_not_found(team_id: i64) -> AppError {
    AppError::NotFound(format!("Team {} not found", team_id))
}

impl Db {
    // ─── Teams ───────────────────────────────────────────────────

    /// Create a team whose counters start in the week opened at `week_start`.
    pub async fn create_team(&self, name: &str, week_start: i64) -> Result<Team, AppError> {
        let team: Team = sqlx::query_as(&format!(
            "INSERT INTO teams (name, counters_week_start) VALUES (?, ?) RETURNING {}",
            TEAM_COLUMNS
        ))
        .bind(name)
        .bind(week_start)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(team_id = team.id, name, "Team created");
        Ok(team)
    }

    pub async fn get_team(&self, team_id: i64) -> Result<Option<Team>, AppError> {
        let team = sqlx::query_as(&format!("SELECT {} FROM teams WHERE id = ?", TEAM_COLUMNS))
            .bind(team_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(team)
    }

    pub async fn list_teams(&self) -> Result<Vec<Team>, AppError> {
        let teams = sqlx::query_as(&format!("SELECT {} FROM teams ORDER BY id", TEAM_COLUMNS))
            .fetch_all(&self.pool)
            .await?;
        Ok(teams)
    }

    /// Rename a team. Returns `(old_name, new_name)`.
    pub async fn rename_team(
        &self,
        team_id: i64,
        new_name: &str,
    ) -> Result<(String, String), AppError> {
        let mut tx = self.pool.begin().await?;

        let (old_name,): (String,) = sqlx::query_as("SELECT name FROM teams WHERE id = ?")
            .bind(team_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| team_not_found(team_id))?;

        sqlx::query("UPDATE teams SET name = ? WHERE id = ?")
            .bind(new_name)
            .bind(team_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(team_id, old_name = %old_name, new_name, "Team renamed");
        Ok((old_name, new_name.to_string()))
    }

    /// Delete a team after clearing its memberships. Returns the number of
    /// memberships removed.
    pub async fn delete_team(&self, team_id: i64) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await?;

        if !team_exists(&mut tx, team_id).await? {
            return Err(team_not_found(team_id));
        }

        let members_removed = sqlx::query("DELETE FROM team_members WHERE team_id = ?")
            .bind(team_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM teams WHERE id = ?")
            .bind(team_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(team_id, members_removed, "Team deleted");
        Ok(members_removed)
    }

    pub async fn set_team_targets(
        &self,
        team_id: i64,
        info_target: i64,
        plan_target: i64,
    ) -> Result<Team, AppError> {
        let team: Team = sqlx::query_as(&format!(
            "UPDATE teams SET weekly_info_target = ?, weekly_plan_target = ?
             WHERE id = ? RETURNING {}",
            TEAM_COLUMNS
        ))
        .bind(info_target)
        .bind(plan_target)
        .bind(team_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| team_not_found(team_id))?;

        tracing::info!(team_id, info_target, plan_target, "Team targets updated");
        Ok(team)
    }

    // ─── Memberships ─────────────────────────────────────────────

    /// Put an identity into a team under `role`.
    ///
    /// An identity holds at most one membership per team, whatever the role.
    /// The UNIQUE(team_id, ir_id) constraint backs the explicit check.
    pub async fn assign_membership(
        &self,
        ir_id: &str,
        team_id: i64,
        role: TeamRole,
    ) -> Result<Membership, AppError> {
        let mut tx = self.pool.begin().await?;

        let identity: Option<(String,)> =
            sqlx::query_as("SELECT ir_id FROM identities WHERE ir_id = ?")
                .bind(ir_id)
                .fetch_optional(&mut *tx)
                .await?;
        if identity.is_none() {
            return Err(AppError::NotFound(format!("IR '{}' not found", ir_id)));
        }
        if !team_exists(&mut tx, team_id).await? {
            return Err(team_not_found(team_id));
        }

        let conflict = || {
            AppError::Conflict(format!(
                "IR '{}' is already assigned to team {}",
                ir_id, team_id
            ))
        };

        let existing: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM team_members WHERE team_id = ? AND ir_id = ?")
                .bind(team_id)
                .bind(ir_id)
                .fetch_optional(&mut *tx)
                .await?;
        if existing.is_some() {
            return Err(conflict());
        }

        let membership: Membership = sqlx::query_as(
            "INSERT INTO team_members (team_id, ir_id, role) VALUES (?, ?, ?)
             RETURNING id, team_id, ir_id, role",
        )
        .bind(team_id)
        .bind(ir_id)
        .bind(role)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::Conflict(_) => conflict(),
            other => other,
        })?;

        tx.commit().await?;

        tracing::info!(ir_id, team_id, role = %role, "IR assigned to team");
        Ok(membership)
    }

    pub async fn remove_membership(&self, team_id: i64, ir_id: &str) -> Result<(), AppError> {
        let removed = sqlx::query("DELETE FROM team_members WHERE team_id = ? AND ir_id = ?")
            .bind(team_id)
            .bind(ir_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if removed == 0 {
            return Err(AppError::NotFound(format!(
                "IR '{}' is not a member of team {}",
                ir_id, team_id
            )));
        }

        tracing::info!(ir_id, team_id, "IR removed from team");
        Ok(())
    }

    pub async fn list_members(&self, team_id: i64) -> Result<Vec<Membership>, AppError> {
        let members = sqlx::query_as(
            "SELECT id, team_id, ir_id, role FROM team_members WHERE team_id = ? ORDER BY id",
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(members)
    }

    /// Teams in which `ir_id` holds `role`.
    pub async fn list_teams_for_identity(
        &self,
        ir_id: &str,
        role: TeamRole,
    ) -> Result<Vec<Team>, AppError> {
        let teams = sqlx::query_as(
            "SELECT t.id, t.name, t.weekly_info_done, t.weekly_plan_done,
                    t.weekly_info_target, t.weekly_plan_target, t.counters_week_start
             FROM teams t
             JOIN team_members m ON m.team_id = t.id
             WHERE m.ir_id = ? AND m.role = ?
             ORDER BY t.id",
        )
        .bind(ir_id)
        .bind(role)
        .fetch_all(&self.pool)
        .await?;
        Ok(teams)
    }

    /// Distinct identities holding `role` in at least one team.
    pub async fn list_by_role(&self, role: TeamRole) -> Result<Vec<RoleHolder>, AppError> {
        let holders = sqlx::query_as(
            "SELECT DISTINCT i.ir_id, i.ir_name
             FROM identities i
             JOIN team_members m ON m.ir_id = i.ir_id
             WHERE m.role = ?
             ORDER BY i.ir_id",
        )
        .bind(role)
        .fetch_all(&self.pool)
        .await?;
        Ok(holders)
    }
}
