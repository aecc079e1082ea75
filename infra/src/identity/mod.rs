//! Identity provider implementations
//!
//! - [`SupabaseIdentityProvider`]: the hosted Supabase GoTrue API over HTTPS
//! - [`InMemoryIdentityProvider`]: process-local accounts for development and tests

mod memory;
mod supabase;

pub use memory::InMemoryIdentityProvider;
pub use supabase::SupabaseIdentityProvider;
