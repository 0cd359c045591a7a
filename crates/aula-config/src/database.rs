//! PostgreSQL connection settings.
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`: connection string (required)
//! - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
//! - `DATABASE_ACQUIRE_TIMEOUT_SECS`: seconds to wait for a pooled connection (default: 5)
//! - `DATABASE_RUN_MIGRATIONS`: apply `migrations/` at startup (default: true)

use std::env;

use thiserror::Error;

use crate::{env_flag, env_or};

/// A required environment variable was not set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0} must be set")]
pub struct MissingVariable(pub &'static str);

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    pub run_migrations: bool,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self, MissingVariable> {
        let url = env::var("DATABASE_URL").map_err(|_| MissingVariable("DATABASE_URL"))?;

        Ok(Self {
            url,
            max_connections: env_or("DATABASE_MAX_CONNECTIONS", 10),
            acquire_timeout_secs: env_or("DATABASE_ACQUIRE_TIMEOUT_SECS", 5),
            run_migrations: env_flag("DATABASE_RUN_MIGRATIONS", true),
        })
    }

    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            acquire_timeout_secs: 5,
            run_migrations: false,
        }
    }
}
