//! Server-side state carried between the two halves of an OTP registration.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::identity::UserProfile;

/// An AES-GCM ciphertext together with its nonce, both base64 encoded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedSecret {
    pub ciphertext: String,
    pub nonce: String,
}

/// Registration data captured by `register/init` and consumed by `register/complete`.
///
/// Keyed by normalized email. The password is never stored in clear text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRegistration {
    pub email: String,
    pub sealed_password: SealedSecret,
    pub profile: UserProfile,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl PendingRegistration {
    pub fn new(
        email: impl Into<String>,
        sealed_password: SealedSecret,
        profile: UserProfile,
        ttl: Duration,
    ) -> Self {
        let now = Utc::now();
        Self {
            email: email.into(),
            sealed_password,
            profile,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}
