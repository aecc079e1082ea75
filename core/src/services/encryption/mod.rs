//! Symmetric encryption of secrets held between request cycles

pub mod password_sealer;

pub use password_sealer::PasswordSealer;
