// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod directory;
pub mod ledger;
pub mod password;
pub mod rollup;

pub use rollup::{run_weekly_rollup, RollupReport};
