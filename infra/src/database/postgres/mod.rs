//! Postgres implementations of the core repository traits

mod pending_registration_repository_impl;
mod token_repository_impl;

pub use pending_registration_repository_impl::PgPendingRegistrationRepository;
pub use token_repository_impl::PgTokenRepository;

/// Map a SQLx error into the domain's internal error with context
pub(crate) fn db_error(context: &str, error: sqlx::Error) -> hive_core::errors::DomainError {
    tracing::error!("{}: {}", context, error);
    hive_core::errors::DomainError::Internal {
        message: format!("{}: {}", context, error),
    }
}
