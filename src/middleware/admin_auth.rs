// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared-secret gate for `/admin/*` routes.
//!
//! Only the administrative endpoints are gated. Identity access levels are
//! stored but not enforced on any other route.

use crate::AppState;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Header carrying the admin token.
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Reject requests whose `x-admin-token` does not match the configured token.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let provided = request
        .headers()
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("");

    let expected = state.config.admin_token.as_bytes();
    let matches: bool = provided.as_bytes().ct_eq(expected).into();

    if expected.is_empty() || !matches {
        tracing::warn!(
            path = %request.uri().path(),
            header_present = !provided.is_empty(),
            "Blocked admin request with invalid token"
        );
        return Err(StatusCode::FORBIDDEN);
    }

    Ok(next.run(request).await)
}
