//! Token cleanup service for periodic maintenance
//!
//! Deletes expired refresh token records and expired pending registrations so
//! neither table grows without bound.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use hive_shared::config::{AuthConfig, RevocationMode};

use crate::errors::DomainError;
use crate::repositories::{PendingRegistrationRepository, TokenRepository};

#[derive(Debug, Clone)]
pub struct TokenCleanupConfig {
    pub interval_seconds: u64,
    pub enabled: bool,
    /// Whether refresh token records are swept as well as pending registrations
    pub sweep_tokens: bool,
}

impl Default for TokenCleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 3600,
            enabled: true,
            sweep_tokens: true,
        }
    }
}

impl From<&AuthConfig> for TokenCleanupConfig {
    fn from(config: &AuthConfig) -> Self {
        Self {
            interval_seconds: config.cleanup_interval_seconds,
            enabled: config.cleanup_enabled,
            // No refresh records are stored in stateless mode
            sweep_tokens: config.revocation == RevocationMode::Persisted,
        }
    }
}

/// Periodic removal of expired refresh token records and pending registrations
pub struct TokenCleanupService<T, P>
where
    T: TokenRepository + ?Sized + 'static,
    P: PendingRegistrationRepository + ?Sized + 'static,
{
    tokens: Arc<T>,
    pending: Arc<P>,
    config: TokenCleanupConfig,
}

impl<T, P> TokenCleanupService<T, P>
where
    T: TokenRepository + ?Sized + 'static,
    P: PendingRegistrationRepository + ?Sized + 'static,
{
    pub fn new(tokens: Arc<T>, pending: Arc<P>, config: TokenCleanupConfig) -> Self {
        Self {
            tokens,
            pending,
            config,
        }
    }

    /// Run a single cleanup cycle
    ///
    /// Failures of one step are recorded in the result and do not stop the other.
    pub async fn run_cleanup(&self) -> Result<CleanupResult, DomainError> {
        let mut result = CleanupResult::default();
        if !self.config.enabled {
            return Ok(result);
        }

        if self.config.sweep_tokens {
            match self.tokens.delete_expired_tokens().await {
                Ok(count) => result.expired_tokens_deleted = count,
                Err(e) => result.errors.push(format!("refresh tokens: {}", e)),
            }
        }

        match self.pending.delete_expired().await {
            Ok(count) => result.pending_registrations_deleted = count,
            Err(e) => result.errors.push(format!("pending registrations: {}", e)),
        }

        if result.is_success() {
            debug!(
                tokens = result.expired_tokens_deleted,
                pending = result.pending_registrations_deleted,
                "Expired records swept"
            );
        } else {
            error!(errors = ?result.errors, "Sweep of expired records failed");
        }

        Ok(result)
    }

    /// Spawn a tokio task sweeping every `interval_seconds`; the first sweep
    /// runs immediately
    pub fn start_background_task(self: Arc<Self>) {
        if !self.config.enabled {
            info!("Expired record sweep is disabled");
            return;
        }

        let period = Duration::from_secs(self.config.interval_seconds.max(1));
        info!(interval_seconds = period.as_secs(), "Starting expired record sweep");

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // A stalled sweep should not trigger a burst of catch-up runs
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                if let Err(e) = self.run_cleanup().await {
                    warn!(error = %e, "Sweep cycle aborted");
                }
            }
        });
    }
}

/// Outcome of one sweep
#[derive(Debug, Default)]
pub struct CleanupResult {
    pub expired_tokens_deleted: usize,
    pub pending_registrations_deleted: usize,
    /// One entry per failed step
    pub errors: Vec<String>,
}

impl CleanupResult {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn total_cleaned(&self) -> usize {
        self.expired_tokens_deleted + self.pending_registrations_deleted
    }
}
