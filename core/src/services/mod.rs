//! Business services containing domain logic and use cases.

pub mod auth;
pub mod encryption;
pub mod identity;
pub mod rate_limit;
pub mod token;

// Re-export commonly used types
pub use auth::{AuthService, AuthServiceConfig, NewRegistration};
pub use encryption::PasswordSealer;
pub use identity::IdentityProvider;
pub use rate_limit::{RateLimitStore, WindowHit};
pub use token::{
    CleanupResult, TokenCleanupConfig, TokenCleanupService, TokenService, TokenServiceConfig,
};
