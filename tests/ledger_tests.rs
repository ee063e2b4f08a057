// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Info/plan ledger tests.

use axum::http::StatusCode;
use serde_json::json;

mod common;

#[tokio::test]
async fn test_add_single_info_entry_bumps_counters() {
    let (app, _) = common::create_test_app().await;
    common::register(&app, "IR1", "Asha").await;
    let team = common::create_team(&app, "Alpha").await;
    common::send_json(
        &app,
        "POST",
        "/api/assign_ir_to_team",
        Some(json!({ "ir_id": "IR1", "team_id": team, "role": "IR" })),
    )
    .await;

    let (status, body) = common::send_json(
        &app,
        "POST",
        "/api/irs/IR1/info_details",
        Some(json!({ "outcome": "A", "comment": "good call", "subject_name": "Meera" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["ids"].as_array().unwrap().len(), 1);

    let (_, ir) = common::send_json(&app, "GET", "/api/irs/IR1", None).await;
    assert_eq!(ir["info_count"], 1);
    assert_eq!(ir["plan_count"], 0);

    let (_, team_body) = common::send_json(&app, "GET", &format!("/api/teams/{}", team), None).await;
    assert_eq!(team_body["weekly_info_done"], 1);
    assert_eq!(team_body["weekly_plan_done"], 0);
}

#[tokio::test]
async fn test_add_batch_of_plan_entries() {
    let (app, _) = common::create_test_app().await;
    common::register(&app, "IR1", "Asha").await;

    let (status, body) = common::send_json(
        &app,
        "POST",
        "/api/irs/IR1/plan_details",
        Some(json!([
            { "subject_name": "Meera" },
            { "subject_name": "Kiran", "comment": "call back" },
        ])),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let ids = body["ids"].as_array().unwrap();
    assert_eq!(ids.len(), 2);
    assert!(ids[0].as_i64().unwrap() < ids[1].as_i64().unwrap());

    let (_, ir) = common::send_json(&app, "GET", "/api/irs/IR1", None).await;
    assert_eq!(ir["plan_count"], 2);
}

#[tokio::test]
async fn test_outcome_rules_per_ledger() {
    let (app, _) = common::create_test_app().await;
    common::register(&app, "IR1", "Asha").await;

    let (status, _) = common::send_json(
        &app,
        "POST",
        "/api/irs/IR1/info_details",
        Some(json!({ "subject_name": "Meera" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = common::send_json(
        &app,
        "POST",
        "/api/irs/IR1/plan_details",
        Some(json!({ "subject_name": "Meera", "outcome": "B" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = common::send_json(
        &app,
        "POST",
        "/api/irs/IR1/info_details",
        Some(json!({ "subject_name": "Meera", "outcome": "Z" })),
    )
    .await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_unknown_owner_is_not_found() {
    let (app, _) = common::create_test_app().await;

    let (status, _) = common::send_json(
        &app,
        "POST",
        "/api/irs/GHOST/info_details",
        Some(json!({ "subject_name": "Meera", "outcome": "A" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) =
        common::send_json(&app, "GET", "/api/irs/GHOST/info_details", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_past_week_entry_skips_team_counter() {
    let (app, _) = common::create_test_app().await;
    common::register(&app, "IR1", "Asha").await;
    let team = common::create_team(&app, "Alpha").await;
    common::send_json(
        &app,
        "POST",
        "/api/assign_ir_to_team",
        Some(json!({ "ir_id": "IR1", "team_id": team, "role": "LDC" })),
    )
    .await;

    let (status, _) = common::send_json(
        &app,
        "POST",
        "/api/irs/IR1/plan_details",
        Some(json!({ "subject_name": "Meera", "recorded_at": "2020-03-02T10:00:00+05:30" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, ir) = common::send_json(&app, "GET", "/api/irs/IR1", None).await;
    assert_eq!(ir["plan_count"], 1);

    let (_, team_body) = common::send_json(&app, "GET", &format!("/api/teams/{}", team), None).await;
    assert_eq!(team_body["weekly_plan_done"], 0);
}

#[tokio::test]
async fn test_query_by_date_range() {
    let (app, _) = common::create_test_app().await;
    common::register(&app, "IR1", "Asha").await;

    for (ts, subject) in [
        ("2024-01-01T00:00:00+05:30", "first-day-start"),
        ("2024-01-01T23:59:59+05:30", "first-day-end"),
        ("2024-01-02T12:00:00+05:30", "second-day"),
        ("2024-01-03T00:00:00+05:30", "third-day"),
    ] {
        let (status, _) = common::send_json(
            &app,
            "POST",
            "/api/irs/IR1/info_details",
            Some(json!({ "subject_name": subject, "outcome": "C", "recorded_at": ts })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = common::send_json(
        &app,
        "GET",
        "/api/irs/IR1/info_details?from_date=2024-01-01&to_date=2024-01-02",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let subjects: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["subject_name"].as_str().unwrap())
        .collect();
    assert_eq!(subjects, ["first-day-start", "first-day-end", "second-day"]);
    assert_eq!(body[0]["recorded_at"], "2024-01-01T00:00:00.000+05:30");
    assert_eq!(body[0]["outcome"], "C");

    let (_, body) = common::send_json(
        &app,
        "GET",
        "/api/irs/IR1/info_details?from_date=2024-01-03",
        None,
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = common::send_json(
        &app,
        "GET",
        "/api/irs/IR1/info_details?from_date=2024-01-03&to_date=2024-01-01",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = common::send_json(
        &app,
        "GET",
        "/api/irs/IR1/info_details?from_date=01-01-2024",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_default_query_returns_today() {
    let (app, _) = common::create_test_app().await;
    common::register(&app, "IR1", "Asha").await;

    common::send_json(
        &app,
        "POST",
        "/api/irs/IR1/plan_details",
        Some(json!({ "subject_name": "today" })),
    )
    .await;
    common::send_json(
        &app,
        "POST",
        "/api/irs/IR1/plan_details",
        Some(json!({ "subject_name": "long ago", "recorded_at": "2021-06-01T09:00:00Z" })),
    )
    .await;

    let (status, body) =
        common::send_json(&app, "GET", "/api/irs/IR1/plan_details", None).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["subject_name"], "today");
    assert!(entries[0].get("outcome").is_none());
}

#[tokio::test]
async fn test_get_update_delete_entry() {
    let (app, _) = common::create_test_app().await;
    common::register(&app, "IR1", "Asha").await;

    let (_, body) = common::send_json(
        &app,
        "POST",
        "/api/irs/IR1/info_details",
        Some(json!({ "subject_name": "Meera", "outcome": "A" })),
    )
    .await;
    let id = body["ids"][0].as_i64().unwrap();
    let uri = format!("/api/info_details/{}", id);

    let (status, entry) = common::send_json(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(entry["ir_id"], "IR1");
    assert_eq!(entry["comment"], "");

    let (status, entry) = common::send_json(
        &app,
        "PUT",
        &uri,
        Some(json!({ "outcome": "B", "comment": "second visit" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(entry["outcome"], "B");
    assert_eq!(entry["comment"], "second visit");
    assert_eq!(entry["subject_name"], "Meera");

    // Entry IDs are per ledger
    let (status, _) =
        common::send_json(&app, "GET", &format!("/api/plan_details/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let response = common::send(&app, "DELETE", &uri, None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let (status, _) = common::send_json(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = common::send_json(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) =
        common::send_json(&app, "PUT", &uri, Some(json!({ "comment": "gone" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Lifetime counter is not decremented by deletion
    let (_, ir) = common::send_json(&app, "GET", "/api/irs/IR1", None).await;
    assert_eq!(ir["info_count"], 1);
}

#[tokio::test]
async fn test_plan_update_rejects_outcome() {
    let (app, _) = common::create_test_app().await;
    common::register(&app, "IR1", "Asha").await;

    let (_, body) = common::send_json(
        &app,
        "POST",
        "/api/irs/IR1/plan_details",
        Some(json!({ "subject_name": "Meera" })),
    )
    .await;
    let id = body["ids"][0].as_i64().unwrap();

    let (status, _) = common::send_json(
        &app,
        "PUT",
        &format!("/api/plan_details/{}", id),
        Some(json!({ "outcome": "A" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
