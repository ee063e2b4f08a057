// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use std::env;

const DEFAULT_DATABASE_URL: &str = "sqlite:ir_tracker.db";
const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite connection URL
    pub database_url: String,
    /// Pool size for the database
    pub db_max_connections: u32,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Shared secret for `/admin/*` routes
    pub admin_token: String,
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let admin_token = env::var("ADMIN_TOKEN")
            .map(|v| v.trim().to_string())
            .map_err(|_| ConfigError::Missing("ADMIN_TOKEN"))?;
        if admin_token.is_empty() {
            return Err(ConfigError::Invalid("ADMIN_TOKEN", "must not be empty"));
        }

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_CONNECTIONS),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| DEFAULT_FRONTEND_URL.to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            admin_token,
        })
    }

    /// Config for tests. Uses an in-memory database URL.
    pub fn test_default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            db_max_connections: 1,
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            port: DEFAULT_PORT,
            admin_token: "test_admin_token".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, &'static str),
}
