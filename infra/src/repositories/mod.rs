//! In-memory repository implementations
//!
//! Used when no `DATABASE_URL` is configured, and as test doubles by the API
//! crate. State lives for the lifetime of the process.

mod pending_registration;
mod token;

pub use pending_registration::InMemoryPendingRegistrationRepository;
pub use token::InMemoryTokenRepository;
