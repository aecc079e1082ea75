//! Startup wiring
//!
//! Picks a backend for every port from the configuration and assembles the
//! [`AppState`] shared by all workers:
//! - Postgres repositories when `DATABASE_URL` is set, in-memory ones otherwise
//! - Supabase when the project URL and key are set, the in-memory provider otherwise
//! - Redis rate limit counters when `REDIS_URL` is set and reachable

use std::sync::Arc;

use anyhow::Context;
use log::{info, warn};

use hive_core::repositories::{NoopTokenRepository, PendingRegistrationRepository, TokenRepository};
use hive_core::services::{
    AuthService, AuthServiceConfig, IdentityProvider, PasswordSealer, RateLimitStore,
    TokenCleanupConfig, TokenCleanupService, TokenService, TokenServiceConfig,
};
use hive_core::DomainError;
use hive_infra::cache::RedisClient;
use hive_infra::database::{DatabasePool, PgPendingRegistrationRepository, PgTokenRepository};
use hive_infra::identity::{InMemoryIdentityProvider, SupabaseIdentityProvider};
use hive_infra::repositories::{InMemoryPendingRegistrationRepository, InMemoryTokenRepository};
use hive_infra::services::{InMemoryRateLimiter, RedisRateLimiter};
use hive_shared::config::{AppConfig, RevocationMode};

use crate::app::AppState;

/// Concrete implementations behind each port
pub struct Backends {
    pub identity: Arc<dyn IdentityProvider>,
    pub tokens: Arc<dyn TokenRepository>,
    pub pending: Arc<dyn PendingRegistrationRepository>,
    pub rate_limiter: Arc<dyn RateLimitStore>,
    pub database: Option<Arc<DatabasePool>>,
}

impl Backends {
    /// Process-local backends around the given identity provider
    pub fn in_memory(identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            identity,
            tokens: Arc::new(InMemoryTokenRepository::new()),
            pending: Arc::new(InMemoryPendingRegistrationRepository::new()),
            rate_limiter: Arc::new(InMemoryRateLimiter::new()),
            database: None,
        }
    }
}

/// Build the services on top of already chosen backends
///
/// In stateless revocation mode the token repository is replaced by one that
/// stores nothing, whatever was passed in.
pub fn assemble_state(config: AppConfig, backends: Backends) -> Result<AppState, DomainError> {
    let sealer = Arc::new(PasswordSealer::from_config(
        config.auth.pending_registration_key.as_deref(),
    )?);

    let tokens: Arc<dyn TokenRepository> = match config.auth.revocation {
        RevocationMode::Persisted => backends.tokens,
        RevocationMode::Stateless => Arc::new(NoopTokenRepository::new()),
    };

    let token_service = Arc::new(TokenService::new(
        tokens,
        TokenServiceConfig::from(&config.auth),
    ));

    let auth_service = Arc::new(AuthService::new(
        backends.identity,
        token_service,
        backends.pending,
        sealer,
        AuthServiceConfig::from(&config.auth),
    ));

    Ok(AppState {
        auth_service,
        rate_limiter: backends.rate_limiter,
        database: backends.database,
        config,
    })
}

/// Connect every configured backend, assemble the state and start the
/// periodic cleanup task
pub async fn build_state(config: AppConfig) -> anyhow::Result<AppState> {
    let (database, tokens, pending) = connect_database(&config).await?;
    let identity = connect_identity_provider(&config)?;
    let rate_limiter = connect_rate_limiter(&config).await;

    let cleanup = Arc::new(TokenCleanupService::new(
        tokens.clone(),
        pending.clone(),
        TokenCleanupConfig::from(&config.auth),
    ));

    let state = assemble_state(
        config,
        Backends {
            identity,
            tokens,
            pending,
            rate_limiter,
            database,
        },
    )
    .context("Failed to assemble application services")?;

    cleanup.start_background_task();

    Ok(state)
}

type Repositories = (
    Option<Arc<DatabasePool>>,
    Arc<dyn TokenRepository>,
    Arc<dyn PendingRegistrationRepository>,
);

async fn connect_database(config: &AppConfig) -> anyhow::Result<Repositories> {
    if config.database.url.is_none() {
        warn!("DATABASE_URL is not set, using in-memory repositories");
        let tokens: Arc<dyn TokenRepository> = Arc::new(InMemoryTokenRepository::new());
        let pending: Arc<dyn PendingRegistrationRepository> =
            Arc::new(InMemoryPendingRegistrationRepository::new());
        return Ok((None, tokens, pending));
    }

    let pool = DatabasePool::new(config.database.clone())
        .await
        .context("Failed to connect to the database")?;
    pool.run_migrations()
        .await
        .context("Failed to run database migrations")?;

    let pg = pool.get_pool().clone();
    info!("Using Postgres repositories");

    let tokens: Arc<dyn TokenRepository> = Arc::new(PgTokenRepository::new(pg.clone()));
    let pending: Arc<dyn PendingRegistrationRepository> =
        Arc::new(PgPendingRegistrationRepository::new(pg));

    Ok((Some(Arc::new(pool)), tokens, pending))
}

fn connect_identity_provider(config: &AppConfig) -> anyhow::Result<Arc<dyn IdentityProvider>> {
    if !config.identity.is_configured() {
        warn!("SUPABASE_URL or SUPABASE_KEY is not set, using the in-memory identity provider");
        return Ok(Arc::new(InMemoryIdentityProvider::new()));
    }

    let provider = SupabaseIdentityProvider::new(&config.identity)
        .context("Failed to create the identity provider client")?;
    if config.identity.service_role_key.is_none() {
        warn!("SUPABASE_SERVICE_ROLE_KEY is not set, register/complete cannot set passwords");
    }
    Ok(Arc::new(provider))
}

/// Redis is optional: an unreachable server degrades to per-process counters
async fn connect_rate_limiter(config: &AppConfig) -> Arc<dyn RateLimitStore> {
    if config.cache.url.is_none() {
        return Arc::new(InMemoryRateLimiter::new());
    }

    match RedisClient::from_config(&config.cache).await {
        Ok(client) => {
            info!("Rate limit counters stored in Redis");
            Arc::new(RedisRateLimiter::new(
                Arc::new(client),
                config.cache.key_prefix.clone(),
            ))
        }
        Err(e) => {
            warn!("Redis unavailable ({}), falling back to in-memory rate limiting", e);
            Arc::new(InMemoryRateLimiter::new())
        }
    }
}
