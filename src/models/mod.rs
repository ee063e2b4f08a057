// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod identity;
pub mod ledger;
pub mod snapshot;
pub mod team;

pub use identity::{Credentials, Identity, IrSlot};
pub use ledger::{LedgerEntry, LedgerKind, Outcome};
pub use snapshot::WeeklySnapshot;
pub use team::{Membership, RoleHolder, Team, TeamRole};
