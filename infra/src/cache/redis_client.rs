//! Redis client with connection retry and fixed-window counters
//!
//! Redis only backs the rate limiter, so the client exposes just the counter
//! primitive it needs plus a health check.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use redis::{aio::MultiplexedConnection, AsyncCommands, Client, ErrorKind, RedisError, RedisResult};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use hive_core::services::rate_limit::WindowHit;
use hive_shared::config::CacheConfig;

use crate::InfrastructureError;

type RedisFuture<T> = Pin<Box<dyn Future<Output = RedisResult<T>> + Send>>;

/// Redis client sharing one multiplexed connection
#[derive(Clone)]
pub struct RedisClient {
    connection: MultiplexedConnection,
    max_retries: u32,
    retry_delay_ms: u64,
}

impl RedisClient {
    /// Connect using the configured URL
    pub async fn from_config(config: &CacheConfig) -> Result<Self, InfrastructureError> {
        let url = config
            .url
            .as_deref()
            .ok_or_else(|| InfrastructureError::Config("REDIS_URL is not set".to_string()))?;
        Self::connect(url).await
    }

    pub async fn connect(url: &str) -> Result<Self, InfrastructureError> {
        Self::connect_with_retry_config(url, 3, 100).await
    }

    /// Connect with a custom retry budget; the delay doubles per attempt up to 5s
    pub async fn connect_with_retry_config(
        url: &str,
        max_retries: u32,
        retry_delay_ms: u64,
    ) -> Result<Self, InfrastructureError> {
        info!("Connecting to Redis at {}", mask_url(url));

        let client = Client::open(url).map_err(|e| {
            error!("Failed to parse Redis URL: {}", e);
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let connection =
            Self::create_connection_with_retry(client, max_retries, retry_delay_ms).await?;

        Ok(Self {
            connection,
            max_retries,
            retry_delay_ms,
        })
    }

    async fn create_connection_with_retry(
        client: Client,
        max_retries: u32,
        retry_delay_ms: u64,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = retry_delay_ms;

        loop {
            attempts += 1;

            match client.get_multiplexed_async_connection().await {
                Ok(connection) => {
                    info!("Connected to Redis");
                    return Ok(connection);
                }
                Err(e) if attempts < max_retries => {
                    warn!(
                        "Failed to connect to Redis (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(5000);
                }
                Err(e) => {
                    error!("Failed to connect to Redis after {} attempts: {}", attempts, e);
                    return Err(InfrastructureError::Cache(e));
                }
            }
        }
    }

    async fn execute_with_retry<F, T>(&self, operation: F) -> RedisResult<T>
    where
        F: Fn(MultiplexedConnection) -> RedisFuture<T>,
    {
        let mut attempts = 0;
        let mut delay = self.retry_delay_ms;

        loop {
            attempts += 1;

            match operation(self.connection.clone()).await {
                Ok(result) => return Ok(result),
                Err(e) if attempts < self.max_retries && is_retriable_error(&e) => {
                    warn!(
                        "Redis operation failed (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, self.max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(5000);
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// PING the server
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        let response = self
            .execute_with_retry(|mut conn| {
                Box::pin(async move { redis::cmd("PING").query_async::<_, String>(&mut conn).await })
            })
            .await?;

        Ok(response == "PONG")
    }

    /// Count one hit in the fixed window stored at `key`
    ///
    /// The first hit sets the expiry. A key that somehow lost its expiry gets it
    /// back, otherwise the counter would never reset.
    pub async fn hit_window(
        &self,
        key: &str,
        window_seconds: u64,
    ) -> Result<WindowHit, InfrastructureError> {
        let key = key.to_string();
        let window = i64::try_from(window_seconds).unwrap_or(i64::MAX);

        let count: u64 = self
            .execute_with_retry(|mut conn| {
                let key = key.clone();
                Box::pin(async move { conn.incr(key, 1u64).await })
            })
            .await?;

        if count == 1 {
            self.expire(&key, window).await?;
        }

        let ttl: i64 = self
            .execute_with_retry(|mut conn| {
                let key = key.clone();
                Box::pin(async move { conn.ttl(key).await })
            })
            .await?;

        // -1: key exists without expiry
        let reset_after_seconds = if ttl < 0 {
            self.expire(&key, window).await?;
            window_seconds
        } else {
            ttl as u64
        };

        debug!(key = %key, count, reset_after_seconds, "Rate limit window hit");

        Ok(WindowHit {
            count,
            reset_after_seconds,
        })
    }

    async fn expire(&self, key: &str, seconds: i64) -> Result<(), InfrastructureError> {
        let key = key.to_string();
        self.execute_with_retry(|mut conn| {
            let key = key.clone();
            Box::pin(async move {
                let _: () = conn.expire(key, seconds).await?;
                Ok(())
            })
        })
        .await?;
        Ok(())
    }
}

/// Errors worth another attempt: dropped connections and a busy or loading server
pub(crate) fn is_retriable_error(error: &RedisError) -> bool {
    matches!(
        error.kind(),
        ErrorKind::IoError | ErrorKind::BusyLoadingError | ErrorKind::TryAgain
    ) || error.is_connection_dropped()
}

/// Hide credentials in a Redis URL before logging it
pub(crate) fn mask_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}****{}", &url[..scheme_end + 3], &url[at..])
        }
        _ => url.to_string(),
    }
}
