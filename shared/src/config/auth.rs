//! Authentication configuration: token signing, revocation and pending registrations

use serde::{Deserialize, Serialize};

use super::{non_blank, parse_or, ConfigError};
use crate::utils::duration::parse_duration;

const DEFAULT_ACCESS_SECRET: &str = "development-access-secret-change-in-production";
const DEFAULT_REFRESH_SECRET: &str = "development-refresh-secret-change-in-production";

/// Upper bound for any configured lifetime: ten years
const MAX_LIFETIME_SECONDS: i64 = 10 * 365 * 86_400;

/// JWT signing configuration
///
/// Access and refresh tokens are signed with distinct secrets so that a token of
/// one kind can never be accepted as the other.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Secret used to sign access tokens
    pub access_secret: String,

    /// Access token lifetime in seconds
    pub access_expiry_seconds: i64,

    /// Secret used to sign refresh tokens
    pub refresh_secret: String,

    /// Refresh token lifetime in seconds
    pub refresh_expiry_seconds: i64,

    /// JWT issuer claim
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            access_secret: DEFAULT_ACCESS_SECRET.to_string(),
            access_expiry_seconds: 24 * 3600,  // 24 hours
            refresh_secret: DEFAULT_REFRESH_SECRET.to_string(),
            refresh_expiry_seconds: 7 * 86400, // 7 days
            issuer: String::from("studyhive"),
        }
    }
}

impl JwtConfig {
    /// Create a configuration with explicit secrets and default lifetimes
    pub fn new(access_secret: impl Into<String>, refresh_secret: impl Into<String>) -> Self {
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            ..Default::default()
        }
    }

    /// Set access token expiry in seconds
    pub fn with_access_expiry_seconds(mut self, seconds: i64) -> Self {
        self.access_expiry_seconds = seconds;
        self
    }

    /// Set refresh token expiry in seconds
    pub fn with_refresh_expiry_seconds(mut self, seconds: i64) -> Self {
        self.refresh_expiry_seconds = seconds;
        self
    }

    pub fn is_using_default_access_secret(&self) -> bool {
        self.access_secret == DEFAULT_ACCESS_SECRET
    }

    pub fn is_using_default_refresh_secret(&self) -> bool {
        self.refresh_secret == DEFAULT_REFRESH_SECRET
    }

    fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            access_secret: non_blank(lookup, "JWT_SECRET").unwrap_or(defaults.access_secret),
            access_expiry_seconds: duration_or(lookup, "JWT_EXPIRES_IN", defaults.access_expiry_seconds)?,
            refresh_secret: non_blank(lookup, "JWT_REFRESH_SECRET")
                .unwrap_or(defaults.refresh_secret),
            refresh_expiry_seconds: duration_or(
                lookup,
                "JWT_REFRESH_EXPIRES_IN",
                defaults.refresh_expiry_seconds,
            )?,
            issuer: non_blank(lookup, "JWT_ISSUER").unwrap_or(defaults.issuer),
        })
    }
}

/// Whether refresh tokens are tracked server-side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RevocationMode {
    /// Refresh tokens are stored (hashed); rotation is single use and logout deletes them
    Persisted,
    /// Nothing is stored; an old refresh token stays usable until it expires
    Stateless,
}

impl Default for RevocationMode {
    fn default() -> Self {
        RevocationMode::Persisted
    }
}

impl std::fmt::Display for RevocationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RevocationMode::Persisted => write!(f, "persisted"),
            RevocationMode::Stateless => write!(f, "stateless"),
        }
    }
}

impl std::str::FromStr for RevocationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "persisted" | "persistent" | "stateful" => Ok(RevocationMode::Persisted),
            "stateless" | "none" => Ok(RevocationMode::Stateless),
            _ => Err(format!("unknown revocation mode: {}", s)),
        }
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,

    /// Refresh token revocation mode
    pub revocation: RevocationMode,

    /// How long a pending registration waits for its code, in seconds
    pub pending_registration_ttl_seconds: i64,

    /// Base64 encoded 32 byte key sealing pending passwords
    #[serde(skip_serializing)]
    pub pending_registration_key: Option<String>,

    /// Whether the expired token sweep runs
    pub cleanup_enabled: bool,

    /// Interval between sweeps in seconds
    pub cleanup_interval_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt: JwtConfig::default(),
            revocation: RevocationMode::default(),
            pending_registration_ttl_seconds: 15 * 60,
            pending_registration_key: None,
            cleanup_enabled: true,
            cleanup_interval_seconds: 3600,
        }
    }
}

impl AuthConfig {
    /// Create from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&|key: &str| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let ttl_minutes: i64 = parse_or(
            lookup,
            "PENDING_REGISTRATION_TTL_MINUTES",
            defaults.pending_registration_ttl_seconds / 60,
        )?;
        let pending_registration_ttl_seconds = ttl_minutes
            .checked_mul(60)
            .filter(|s| (60..=MAX_LIFETIME_SECONDS).contains(s))
            .ok_or_else(|| ConfigError::InvalidValue {
                key: "PENDING_REGISTRATION_TTL_MINUTES".to_string(),
                message: format!("must be between 1 and {} minutes", MAX_LIFETIME_SECONDS / 60),
            })?;

        Ok(Self {
            jwt: JwtConfig::from_lookup(lookup)?,
            revocation: parse_or(lookup, "TOKEN_REVOCATION", defaults.revocation)?,
            pending_registration_ttl_seconds,
            pending_registration_key: non_blank(lookup, "PENDING_REGISTRATION_KEY"),
            cleanup_enabled: parse_or(lookup, "TOKEN_CLEANUP_ENABLED", defaults.cleanup_enabled)?,
            cleanup_interval_seconds: parse_or(
                lookup,
                "TOKEN_CLEANUP_INTERVAL_SECONDS",
                defaults.cleanup_interval_seconds,
            )?,
        })
    }
}

fn duration_or<F>(lookup: &F, key: &str, default: i64) -> Result<i64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = non_blank(lookup, key) else {
        return Ok(default);
    };
    let invalid = |message: String| ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    };

    let duration = parse_duration(&raw).map_err(|e| invalid(e.to_string()))?;
    // Token timestamps have whole second resolution
    if duration.as_secs() == 0 {
        return Err(invalid(format!("'{}' is shorter than one second", raw.trim())));
    }

    i64::try_from(duration.as_secs())
        .ok()
        .filter(|secs| *secs <= MAX_LIFETIME_SECONDS)
        .ok_or_else(|| invalid(format!("'{}' exceeds the ten year maximum", raw.trim())))
}
