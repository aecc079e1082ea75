//! Process-local identity provider
//!
//! Never sends email. One-time codes are written to the log at info level and can
//! be read back with [`InMemoryIdentityProvider::last_code`].

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use rand::Rng;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use hive_core::domain::entities::identity::{Identity, UserProfile, UserUpdate};
use hive_core::errors::{AuthError, DomainError, DomainResult};
use hive_core::services::identity::IdentityProvider;
use hive_shared::utils::validation::mask_email;

const DEFAULT_CODE_TTL_SECONDS: i64 = 300;

#[derive(Debug, Clone)]
struct Account {
    identity: Identity,
    password_hash: Option<String>,
    profile: UserProfile,
}

#[derive(Debug, Clone)]
struct IssuedCode {
    code: String,
    expires_at: DateTime<Utc>,
}

/// Identity provider keeping accounts in memory, keyed by email
pub struct InMemoryIdentityProvider {
    accounts: RwLock<HashMap<String, Account>>,
    codes: RwLock<HashMap<String, IssuedCode>>,
    hash_cost: u32,
    code_ttl: Duration,
}

impl Default for InMemoryIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            codes: RwLock::new(HashMap::new()),
            hash_cost: bcrypt::DEFAULT_COST,
            code_ttl: Duration::seconds(DEFAULT_CODE_TTL_SECONDS),
        }
    }

    /// Override the bcrypt cost; tests use the minimum of 4
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    pub fn with_code_ttl(mut self, ttl: Duration) -> Self {
        self.code_ttl = ttl;
        self
    }

    /// The code most recently issued to `email`, if still outstanding
    pub async fn last_code(&self, email: &str) -> Option<String> {
        self.codes.read().await.get(email).map(|issued| issued.code.clone())
    }

    /// Profile attributes stored for `email`
    pub async fn profile(&self, email: &str) -> Option<UserProfile> {
        self.accounts
            .read()
            .await
            .get(email)
            .map(|account| account.profile.clone())
    }

    fn hash(&self, password: &str) -> DomainResult<String> {
        bcrypt::hash(password, self.hash_cost)
            .map_err(|e| DomainError::internal(format!("Password hashing failed: {}", e)))
    }

    fn generate_code() -> String {
        let value: u32 = rand::thread_rng().gen_range(0..1_000_000);
        format!("{:06}", value)
    }
}

fn merge_profile(target: &mut UserProfile, update: &UserProfile) {
    if update.first_name.is_some() {
        target.first_name = update.first_name.clone();
    }
    if update.last_name.is_some() {
        target.last_name = update.last_name.clone();
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        profile: &UserProfile,
    ) -> DomainResult<Identity> {
        let password_hash = self.hash(password)?;

        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(email) {
            return Err(AuthError::UserAlreadyExists.into());
        }

        let identity = Identity::new(Uuid::new_v4(), email);
        accounts.insert(
            email.to_string(),
            Account {
                identity: identity.clone(),
                password_hash: Some(password_hash),
                profile: profile.clone(),
            },
        );

        debug!("Created account for {}", mask_email(email));
        Ok(identity)
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> DomainResult<Identity> {
        let account = self
            .accounts
            .read()
            .await
            .get(email)
            .cloned()
            .ok_or(AuthError::InvalidCredentials)?;

        let hash = account
            .password_hash
            .as_deref()
            .ok_or(AuthError::InvalidCredentials)?;

        let matches = bcrypt::verify(password, hash)
            .map_err(|e| DomainError::internal(format!("Password verification failed: {}", e)))?;

        if !matches {
            return Err(AuthError::InvalidCredentials.into());
        }

        Ok(account.identity)
    }

    async fn send_otp(&self, email: &str, create_user: bool) -> DomainResult<()> {
        {
            let mut accounts = self.accounts.write().await;
            if !accounts.contains_key(email) {
                if !create_user {
                    return Err(AuthError::InvalidCredentials.into());
                }
                accounts.insert(
                    email.to_string(),
                    Account {
                        identity: Identity::new(Uuid::new_v4(), email),
                        password_hash: None,
                        profile: UserProfile::default(),
                    },
                );
            }
        }

        let code = Self::generate_code();
        info!("One-time code for {}: {}", mask_email(email), code);

        self.codes.write().await.insert(
            email.to_string(),
            IssuedCode {
                code,
                expires_at: Utc::now() + self.code_ttl,
            },
        );

        Ok(())
    }

    async fn verify_otp(&self, email: &str, code: &str) -> DomainResult<Identity> {
        {
            let mut codes = self.codes.write().await;
            let issued = codes.get(email).ok_or(AuthError::InvalidCredentials)?;

            if Utc::now() >= issued.expires_at {
                codes.remove(email);
                return Err(AuthError::InvalidCredentials.into());
            }

            if !constant_time_eq(issued.code.as_bytes(), code.as_bytes()) {
                return Err(AuthError::InvalidCredentials.into());
            }

            // Single use
            codes.remove(email);
        }

        self.accounts
            .read()
            .await
            .get(email)
            .map(|account| account.identity.clone())
            .ok_or_else(|| AuthError::InvalidCredentials.into())
    }

    async fn update_user(&self, user_id: Uuid, update: &UserUpdate) -> DomainResult<()> {
        let password_hash = match &update.password {
            Some(password) => Some(self.hash(password)?),
            None => None,
        };

        let mut accounts = self.accounts.write().await;
        let account = accounts
            .values_mut()
            .find(|account| account.identity.id == user_id)
            .ok_or_else(|| DomainError::NotFound {
                resource: format!("user {}", user_id),
            })?;

        if password_hash.is_some() {
            account.password_hash = password_hash;
        }
        merge_profile(&mut account.profile, &update.profile);

        Ok(())
    }

    async fn send_password_reset(&self, email: &str) -> DomainResult<()> {
        info!("Password reset requested for {}", mask_email(email));
        Ok(())
    }
}
