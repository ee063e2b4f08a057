// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! IR-Tracker: team management backend for individual reporters (IRs)
//!
//! This crate provides the backend API for reserving and registering IR
//! identities, grouping them into role-tagged teams, recording info/plan
//! activity entries, and archiving weekly team totals on a Friday 21:31
//! (UTC+5:30) week boundary.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Db;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Db,
}
