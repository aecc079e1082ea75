//! Hosted auth provider (Supabase GoTrue) configuration

use serde::{Deserialize, Serialize};

use super::{non_blank, parse_or, ConfigError};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IdentityProviderConfig {
    /// Project URL, e.g. `https://abc.supabase.co`
    pub url: Option<String>,

    /// Public (anon) API key sent with every request
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Service role key, required to set the password of a user created by OTP
    #[serde(skip_serializing)]
    pub service_role_key: Option<String>,

    /// Per-request timeout in seconds
    pub request_timeout_seconds: u64,
}

impl Default for IdentityProviderConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            service_role_key: None,
            request_timeout_seconds: 10,
        }
    }
}

impl IdentityProviderConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&|key: &str| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = non_blank(lookup, "SUPABASE_URL").map(|u| u.trim_end_matches('/').to_string());
        Ok(Self {
            url,
            api_key: non_blank(lookup, "SUPABASE_KEY"),
            service_role_key: non_blank(lookup, "SUPABASE_SERVICE_ROLE_KEY"),
            request_timeout_seconds: parse_or(lookup, "SUPABASE_TIMEOUT_SECONDS", 10)?,
        })
    }

    /// Whether a hosted provider can be used at all
    pub fn is_configured(&self) -> bool {
        self.url.is_some() && self.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_stripped() {
        let lookup = |key: &str| match key {
            "SUPABASE_URL" => Some("https://abc.supabase.co/".to_string()),
            "SUPABASE_KEY" => Some("anon".to_string()),
            _ => None,
        };
        let config = IdentityProviderConfig::from_lookup(&lookup).unwrap();
        assert_eq!(config.url.as_deref(), Some("https://abc.supabase.co"));
        assert!(config.is_configured());
    }

    #[test]
    fn test_missing_key_is_not_configured() {
        let lookup = |key: &str| (key == "SUPABASE_URL").then(|| "https://abc.supabase.co".to_string());
        let config = IdentityProviderConfig::from_lookup(&lookup).unwrap();
        assert!(!config.is_configured());
    }
}
