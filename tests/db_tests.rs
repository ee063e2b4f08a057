// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Storage-level tests against the `Db` handle directly.

use ir_tracker::db::{tables, EntryInput};
use ir_tracker::error::AppError;
use ir_tracker::models::identity::RegisterIdentity;
use ir_tracker::models::{LedgerKind, Outcome, TeamRole};
use ir_tracker::time_utils::WEEK_MILLIS;

mod common;

fn registration(ir_id: &str) -> RegisterIdentity {
    RegisterIdentity {
        ir_id: ir_id.to_string(),
        ir_name: "Asha".to_string(),
        ir_email: "asha@example.com".to_string(),
        ir_password: "unused-plaintext".to_string(),
        ir_access_level: 5,
        weekly_info_target: None,
        weekly_plan_target: None,
        weekly_uv_target: None,
    }
}

fn entry(recorded_at: i64, outcome: Option<Outcome>) -> EntryInput {
    EntryInput {
        recorded_at,
        outcome,
        comment: String::new(),
        subject_name: "Meera".to_string(),
    }
}

#[tokio::test]
async fn test_foreign_keys_enforced() {
    let db = common::test_db().await;
    let enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(enabled, 1);
}

#[tokio::test]
async fn test_all_tables_created() {
    let db = common::test_db().await;
    for table in tables::ALL {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
        )
        .bind(table)
        .fetch_one(db.pool())
        .await
        .unwrap();
        assert_eq!(count, 1, "missing table {}", table);
    }
}

#[tokio::test]
async fn test_password_hash_is_stored_not_returned() {
    let db = common::test_db().await;
    db.reserve_slot("IR1").await.unwrap();
    let identity = db
        .register_identity(&registration("IR1"), "$argon2id$stub", "06-01-2024")
        .await
        .unwrap();
    assert_eq!(identity.started_date, "06-01-2024");

    let credentials = db.get_credentials("IR1").await.unwrap().unwrap();
    assert_eq!(credentials.ir_password, "$argon2id$stub");
}

#[tokio::test]
async fn test_entries_only_bump_teams_of_owner() {
    let db = common::test_db().await;
    for id in ["IR1", "IR2"] {
        db.reserve_slot(id).await.unwrap();
        db.register_identity(&registration(id), "hash", "01-01-2024")
            .await
            .unwrap();
    }
    let mine = db.create_team("Mine", 1_000).await.unwrap();
    let other = db.create_team("Other", 1_000).await.unwrap();
    db.assign_membership("IR1", mine.id, TeamRole::Ir)
        .await
        .unwrap();
    db.assign_membership("IR2", other.id, TeamRole::Ldc)
        .await
        .unwrap();

    let ids = db
        .add_entries(
            LedgerKind::Info,
            "IR1",
            &[entry(2_000, Some(Outcome::A)), entry(500, Some(Outcome::B))],
        )
        .await
        .unwrap();
    assert_eq!(ids.len(), 2);

    // Only the entry inside the team's open week counts for the team
    assert_eq!(db.get_team(mine.id).await.unwrap().unwrap().weekly_info_done, 1);
    assert_eq!(db.get_team(other.id).await.unwrap().unwrap().weekly_info_done, 0);
    assert_eq!(db.get_identity("IR1").await.unwrap().unwrap().info_count, 2);
}

#[tokio::test]
async fn test_snapshots_outlive_their_team() {
    let db = common::test_db().await;
    let team = db.create_team("Alpha", 0).await.unwrap();
    let next_week = WEEK_MILLIS;

    assert!(db.archive_team_week(team.id, next_week, 2_000).await.unwrap());
    assert!(!db.archive_team_week(team.id, next_week, 3_000).await.unwrap());

    db.delete_team(team.id).await.unwrap();
    let snapshots = db.list_snapshots(team.id).await.unwrap();
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].week_start, 0);
    assert_eq!(snapshots[0].created_at, 2_000);
}

#[tokio::test]
async fn test_team_counters_follow_open_week() {
    let db = common::test_db().await;
    db.reserve_slot("IR1").await.unwrap();
    db.register_identity(&registration("IR1"), "hash", "01-01-2024")
        .await
        .unwrap();
    let team = db.create_team("Alpha", 0).await.unwrap();
    db.assign_membership("IR1", team.id, TeamRole::Gc)
        .await
        .unwrap();

    // One entry in the open week, one already in the next
    db.add_entries(
        LedgerKind::Plan,
        "IR1",
        &[entry(WEEK_MILLIS - 1, None), entry(WEEK_MILLIS, None)],
    )
    .await
    .unwrap();
    assert_eq!(db.get_team(team.id).await.unwrap().unwrap().weekly_plan_done, 1);

    // A rollup that is not past the open week leaves the team alone
    assert!(!db.archive_team_week(team.id, 0, 5).await.unwrap());

    assert!(db.archive_team_week(team.id, WEEK_MILLIS, 5).await.unwrap());
    let snapshots = db.list_snapshots(team.id).await.unwrap();
    assert_eq!(snapshots[0].archived_plan_done, 1);

    let team = db.get_team(team.id).await.unwrap().unwrap();
    assert_eq!(team.counters_week_start, WEEK_MILLIS);
    assert_eq!(team.weekly_plan_done, 1);
}

#[tokio::test]
async fn test_archive_missing_team_is_skipped() {
    let db = common::test_db().await;
    assert!(!db.archive_team_week(42, 1_000, 2_000).await.unwrap());
}

#[tokio::test]
async fn test_reset_all_recreates_schema() {
    let db = common::test_db().await;
    db.reserve_slot("IR1").await.unwrap();
    db.create_team("Alpha", 0).await.unwrap();

    db.reset_all().await.unwrap();

    assert!(db.list_slots().await.unwrap().is_empty());
    assert!(db.list_teams().await.unwrap().is_empty());
    db.reserve_slot("IR1").await.unwrap();

    let err = db.reserve_slot("IR1").await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}
