//! Postgres pool holding refresh token records and pending registrations

use std::str::FromStr;
use std::time::Duration;

use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    ConnectOptions, PgPool,
};
use tracing::log::LevelFilter;

use hive_shared::config::DatabaseConfig;

use crate::InfrastructureError;

/// Queries slower than this are logged at warn level
const SLOW_QUERY_THRESHOLD: Duration = Duration::from_millis(500);

/// Shared Postgres pool
#[derive(Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Open the pool described by `config`
    ///
    /// Fails with a configuration error when `DATABASE_URL` is unset or malformed,
    /// and with a database error when the server cannot be reached within
    /// `connect_timeout`.
    pub async fn new(config: DatabaseConfig) -> Result<Self, InfrastructureError> {
        let url = config
            .url
            .as_deref()
            .ok_or_else(|| InfrastructureError::Config("DATABASE_URL is not set".to_string()))?;

        let options = PgConnectOptions::from_str(url)
            .map_err(|e| InfrastructureError::Config(format!("Invalid DATABASE_URL: {}", e)))?
            .log_statements(LevelFilter::Trace)
            .log_slow_statements(LevelFilter::Warn, SLOW_QUERY_THRESHOLD);

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout))
            .idle_timeout(Duration::from_secs(config.idle_timeout))
            .max_lifetime(Duration::from_secs(config.max_lifetime))
            .connect_with(options)
            .await?;

        tracing::info!(
            max_connections = config.max_connections,
            "Connected to Postgres"
        );

        Ok(Self { pool })
    }

    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }

    /// Whether a trivial query round-trips; used by `/health`
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        let one: i32 = sqlx::query_scalar("SELECT 1").fetch_one(&self.pool).await?;
        Ok(one == 1)
    }

    /// Apply the migrations under `infra/migrations`
    ///
    /// Already applied migrations are skipped, so this runs on every start.
    pub async fn run_migrations(&self) -> Result<(), InfrastructureError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Database schema is up to date");
        Ok(())
    }
}
