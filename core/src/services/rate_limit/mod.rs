//! Fixed-window counter storage used by the HTTP rate limiter

use async_trait::async_trait;

/// State of a window after recording one hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowHit {
    /// Hits recorded in the current window, this one included
    pub count: u64,
    /// Seconds until the window resets
    pub reset_after_seconds: u64,
}

impl WindowHit {
    pub fn exceeds(&self, max: u32) -> bool {
        self.count > u64::from(max)
    }
}

/// Trait for rate limiter backends
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Record one hit for `key`, opening a `window_seconds` window on the first
    async fn hit(&self, key: &str, window_seconds: u64) -> Result<WindowHit, String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exceeds_is_strict() {
        let hit = WindowHit {
            count: 10,
            reset_after_seconds: 30,
        };
        assert!(!hit.exceeds(10));
        assert!(hit.exceeds(9));
    }
}
