//! # Aula DB
//!
//! PostgreSQL pool construction and the database probe used by the health
//! endpoints.
//!
//! # Example
//!
//! ```ignore
//! use aula_config::DatabaseConfig;
//! use aula_db::init_db_pool;
//!
//! let pool = init_db_pool(&DatabaseConfig::from_env()?).await?;
//! aula_db::ping(&pool).await?;
//! ```

use std::time::Duration;

use aula_config::DatabaseConfig;
use sqlx::postgres::PgPoolOptions;

pub use sqlx::PgPool;

/// Upper bound for a single probe so a hung database cannot stall health checks.
pub const PING_TIMEOUT: Duration = Duration::from_secs(2);

/// Connects a pool eagerly, failing if the database is unreachable.
pub async fn init_db_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    pool_options(config).connect(&config.url).await
}

/// Builds a pool that opens connections on first use.
///
/// Used where startup must not depend on the database being up.
pub fn lazy_db_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    pool_options(config).connect_lazy(&config.url)
}

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
}

/// Runs `SELECT 1` against the pool, bounded by [`PING_TIMEOUT`].
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    match tokio::time::timeout(PING_TIMEOUT, sqlx::query("SELECT 1").execute(pool)).await {
        Ok(result) => result.map(|_| ()),
        Err(_) => Err(sqlx::Error::PoolTimedOut),
    }
}

/// Applies the workspace migrations (`migrations/` at the repository root).
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}
