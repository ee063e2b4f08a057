// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer (SQLite via sqlx).
//!
//! `Db` is a cheap, cloneable handle around a connection pool. It is
//! constructed once at startup and passed to handlers through `AppState`.

mod identity;
mod ledger;
mod rollup;
mod team;

pub use ledger::{EntryInput, EntryPatch};

use crate::error::AppError;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;

/// Versioned schema, embedded at compile time.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Table names as constants, in drop order (dependents first).
pub mod tables {
    pub const WEEKLY_SNAPSHOTS: &str = "weekly_snapshots";
    pub const INFO_DETAILS: &str = "info_details";
    pub const PLAN_DETAILS: &str = "plan_details";
    pub const TEAM_MEMBERS: &str = "team_members";
    pub const TEAMS: &str = "teams";
    pub const IDENTITIES: &str = "identities";
    pub const IR_SLOTS: &str = "ir_slots";
    /// Migration ledger maintained by sqlx
    pub const MIGRATIONS: &str = "_sqlx_migrations";

    pub const ALL: [&str; 8] = [
        WEEKLY_SNAPSHOTS,
        INFO_DETAILS,
        PLAN_DETAILS,
        TEAM_MEMBERS,
        TEAMS,
        IDENTITIES,
        IR_SLOTS,
        MIGRATIONS,
    ];
}

/// SQLite database client.
#[derive(Clone)]
pub struct Db {
    pool: SqlitePool,
}

impl Db {
    /// Open (creating if missing) the database at `url` and apply migrations.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| AppError::Database(format!("Invalid database URL: {}", e)))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database: {}", e)))?;

        tracing::info!(url, max_connections, "Connected to SQLite");

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Private in-memory database for tests.
    ///
    /// An in-memory SQLite database lives and dies with its connection, so the
    /// pool is pinned to a single connection that never expires.
    pub async fn connect_in_memory() -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| AppError::Database(format!("Invalid database URL: {}", e)))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to open in-memory database: {}", e)))?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    async fn migrate(&self) -> Result<(), AppError> {
        MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to apply migrations: {}", e)))?;
        tracing::info!("Database migrations applied");
        Ok(())
    }

    /// Underlying pool, for callers that need raw access (tests, tooling).
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // ─── Administrative ──────────────────────────────────────────

    /// Drop every table, including the migration ledger, and rebuild the schema.
    pub async fn reset_all(&self) -> Result<(), AppError> {
        let mut conn = self.pool.acquire().await?;

        sqlx::query("PRAGMA foreign_keys = OFF")
            .execute(&mut *conn)
            .await?;
        for table in tables::ALL {
            sqlx::query(&format!("DROP TABLE IF EXISTS {}", table))
                .execute(&mut *conn)
                .await?;
        }
        sqlx::query("PRAGMA foreign_keys = ON")
            .execute(&mut *conn)
            .await?;
        // Release before migrating; the in-memory pool has a single connection.
        drop(conn);

        self.migrate().await?;

        tracing::warn!("All data dropped and schema recreated");
        Ok(())
    }
}
