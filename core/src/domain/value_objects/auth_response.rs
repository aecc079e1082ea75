//! Authentication response value objects for API responses.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{Identity, TokenPair};

/// Public view of the authenticated user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserView {
    pub id: Uuid,
    pub email: String,
}

impl From<Identity> for UserView {
    fn from(identity: Identity) -> Self {
        Self {
            id: identity.id,
            email: identity.email,
        }
    }
}

/// Authentication response containing the user and a fresh token pair
///
/// Returned by every flow that ends in a session: register, register/complete,
/// login and login/complete.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthResponse {
    pub user: UserView,
    pub tokens: TokenPair,
}

impl AuthResponse {
    pub fn new(identity: Identity, tokens: TokenPair) -> Self {
        Self {
            user: identity.into(),
            tokens,
        }
    }
}

/// Response of the refresh endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefreshResponse {
    pub tokens: TokenPair,
}
