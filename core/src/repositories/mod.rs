pub mod pending_registration;
pub mod token;

pub use pending_registration::PendingRegistrationRepository;
pub use token::{NoopTokenRepository, TokenRepository};

#[cfg(test)]
pub use pending_registration::MockPendingRegistrationRepository;
#[cfg(test)]
pub use token::MockTokenRepository;
