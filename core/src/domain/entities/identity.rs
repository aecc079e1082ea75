//! The user identity as known to the hosted identity provider.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A verified user: the provider-assigned id plus email.
///
/// This is the only user state the service keeps; profile data lives upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
}

impl Identity {
    pub fn new(id: Uuid, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
        }
    }
}

/// Optional profile fields forwarded to the provider at sign-up
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl UserProfile {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none()
    }
}

/// Attribute changes applied to an existing provider account
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub password: Option<String>,
    pub profile: UserProfile,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.password.is_none() && self.profile.is_empty()
    }
}
