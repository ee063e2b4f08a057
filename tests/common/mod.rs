// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
};
use ir_tracker::config::Config;
use ir_tracker::db::Db;
use ir_tracker::routes::create_router;
use ir_tracker::AppState;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Create an empty, fully migrated in-memory database.
#[allow(dead_code)]
pub async fn test_db() -> Db {
    Db::connect_in_memory()
        .await
        .expect("Failed to open in-memory database")
}

/// Create a test app backed by a fresh in-memory database.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub async fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = test_db().await;

    let state = Arc::new(AppState { config, db });

    (create_router(state.clone()), state)
}

/// Send one request through a clone of `app`.
#[allow(dead_code)]
pub async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

/// Send a request and decode the JSON response body.
#[allow(dead_code)]
pub async fn send_json(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let response = send(app, method, uri, body).await;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

/// Reserve a slot and register an identity with a known password.
#[allow(dead_code)]
pub async fn register(app: &axum::Router, ir_id: &str, name: &str) {
    let (status, _) = send_json(
        app,
        "POST",
        "/api/add_ir_id",
        Some(serde_json::json!({ "ir_id": ir_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send_json(
        app,
        "POST",
        "/api/register_new_ir",
        Some(serde_json::json!({
            "ir_id": ir_id,
            "ir_name": name,
            "ir_email": format!("{}@example.com", ir_id.to_lowercase()),
            "ir_password": "correct-horse",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

/// Create a team and return its generated ID.
#[allow(dead_code)]
pub async fn create_team(app: &axum::Router, name: &str) -> i64 {
    let (status, body) = send_json(
        app,
        "POST",
        "/api/create_team",
        Some(serde_json::json!({ "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["team_id"].as_i64().unwrap()
}
