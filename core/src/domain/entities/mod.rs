//! Domain entities representing core business objects.

pub mod identity;
pub mod pending_registration;
pub mod token;


// Re-export commonly used types
pub use identity::{Identity, UserProfile, UserUpdate};
pub use pending_registration::{PendingRegistration, SealedSecret};
pub use token::{Claims, RefreshTokenRecord, TokenKind, TokenPair, TOKEN_TYPE_BEARER};
