//! Fixed-window rate limit stores
//!
//! Redis keeps the counters shared between instances; the in-memory store is
//! used when no `REDIS_URL` is configured.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use hive_core::services::rate_limit::{RateLimitStore, WindowHit};

use crate::cache::RedisClient;

/// Redis-backed rate limit store
pub struct RedisRateLimiter {
    redis_client: Arc<RedisClient>,
    key_prefix: Option<String>,
}

impl RedisRateLimiter {
    pub fn new(redis_client: Arc<RedisClient>, key_prefix: Option<String>) -> Self {
        Self {
            redis_client,
            key_prefix,
        }
    }

    fn key(&self, key: &str) -> String {
        match &self.key_prefix {
            Some(prefix) => format!("{}:{}", prefix, key),
            None => key.to_string(),
        }
    }
}

#[async_trait]
impl RateLimitStore for RedisRateLimiter {
    async fn hit(&self, key: &str, window_seconds: u64) -> Result<WindowHit, String> {
        self.redis_client
            .hit_window(&self.key(key), window_seconds)
            .await
            .map_err(|e| e.to_string())
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u64,
    started: Instant,
}

/// Process-local rate limit store
///
/// Counters are not shared between instances. Stale windows are swept once the
/// map grows past `sweep_threshold` entries.
pub struct InMemoryRateLimiter {
    windows: Mutex<HashMap<String, Window>>,
    sweep_threshold: usize,
}

impl Default for InMemoryRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRateLimiter {
    pub fn new() -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            sweep_threshold: 10_000,
        }
    }

    pub async fn len(&self) -> usize {
        self.windows.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.windows.lock().await.is_empty()
    }
}

#[async_trait]
impl RateLimitStore for InMemoryRateLimiter {
    async fn hit(&self, key: &str, window_seconds: u64) -> Result<WindowHit, String> {
        let window = Duration::from_secs(window_seconds.max(1));
        let now = Instant::now();
        let mut windows = self.windows.lock().await;

        if windows.len() >= self.sweep_threshold {
            windows.retain(|_, w| now.duration_since(w.started) < window);
        }

        let entry = windows.entry(key.to_string()).or_insert(Window {
            count: 0,
            started: now,
        });

        let elapsed = now.duration_since(entry.started);
        if elapsed >= window {
            *entry = Window {
                count: 0,
                started: now,
            };
        }

        entry.count += 1;
        let remaining = window.saturating_sub(now.duration_since(entry.started));

        Ok(WindowHit {
            count: entry.count,
            // Round up so a client never retries a fraction of a second early
            reset_after_seconds: remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0),
        })
    }
}
