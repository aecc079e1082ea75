//! Password sealing using AES-256-GCM
//!
//! A pending registration keeps the user's chosen password until the emailed
//! code is confirmed. It is sealed with a process-wide key and a fresh random
//! nonce per seal, so equal passwords never produce equal ciphertexts.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rand::{rngs::OsRng, RngCore};
use tracing::warn;

use crate::domain::entities::pending_registration::SealedSecret;
use crate::errors::{DomainError, DomainResult};

/// AES-256 key length in bytes
pub const KEY_LENGTH: usize = 32;

/// AES-GCM nonce length in bytes
const NONCE_LENGTH: usize = 12;

/// Seals and unseals short secrets with AES-256-GCM
pub struct PasswordSealer {
    cipher: Aes256Gcm,
}

impl PasswordSealer {
    /// Create a sealer from raw key bytes
    pub fn new(key: &[u8]) -> DomainResult<Self> {
        if key.len() != KEY_LENGTH {
            return Err(DomainError::internal("Invalid key size for AES-256"));
        }

        Ok(Self {
            cipher: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key)),
        })
    }

    /// Create a sealer from a base64 encoded 32-byte key
    pub fn from_base64(encoded: &str) -> DomainResult<Self> {
        let key = BASE64
            .decode(encoded.trim())
            .map_err(|_| DomainError::internal("Sealing key is not valid base64"))?;
        Self::new(&key)
    }

    /// Create a sealer with a random key that lives only as long as the process
    pub fn generate() -> Self {
        warn!("No sealing key configured, generated an ephemeral one; pending registrations will not survive a restart");

        let mut key = [0u8; KEY_LENGTH];
        OsRng.fill_bytes(&mut key);
        Self {
            cipher: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key)),
        }
    }

    /// Build from an optional configured key, falling back to [`PasswordSealer::generate`]
    pub fn from_config(key: Option<&str>) -> DomainResult<Self> {
        match key {
            Some(encoded) => Self::from_base64(encoded),
            None => Ok(Self::generate()),
        }
    }

    pub fn seal(&self, plaintext: &str) -> DomainResult<SealedSecret> {
        let mut nonce = [0u8; NONCE_LENGTH];
        OsRng.fill_bytes(&mut nonce);

        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext.as_bytes())
            .map_err(|e| DomainError::internal(format!("Encryption failed: {}", e)))?;

        Ok(SealedSecret {
            ciphertext: BASE64.encode(ciphertext),
            nonce: BASE64.encode(nonce),
        })
    }

    /// Fails with `Internal` on a wrong key or tampered ciphertext
    pub fn unseal(&self, sealed: &SealedSecret) -> DomainResult<String> {
        let ciphertext = BASE64
            .decode(&sealed.ciphertext)
            .map_err(|_| DomainError::internal("Sealed secret is not valid base64"))?;
        let nonce = BASE64
            .decode(&sealed.nonce)
            .map_err(|_| DomainError::internal("Sealed nonce is not valid base64"))?;

        if nonce.len() != NONCE_LENGTH {
            return Err(DomainError::internal("Invalid nonce size for AES-GCM"));
        }

        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(&nonce), ciphertext.as_ref())
            .map_err(|_| DomainError::internal("Failed to unseal secret"))?;

        String::from_utf8(plaintext).map_err(|_| DomainError::internal("Unsealed secret is not UTF-8"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sealer() -> PasswordSealer {
        PasswordSealer::new(&[7u8; KEY_LENGTH]).unwrap()
    }

    #[test]
    fn test_seal_then_unseal() {
        let sealer = sealer();
        let sealed = sealer.seal("correct horse").unwrap();

        assert_ne!(sealed.ciphertext, "correct horse");
        assert_eq!(sealer.unseal(&sealed).unwrap(), "correct horse");
    }

    #[test]
    fn test_nonce_is_fresh_per_seal() {
        let sealer = sealer();
        let a = sealer.seal("same").unwrap();
        let b = sealer.seal("same").unwrap();

        assert_ne!(a.nonce, b.nonce);
        assert_ne!(a.ciphertext, b.ciphertext);
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let sealer = sealer();
        let mut sealed = sealer.seal("secret-password").unwrap();
        let mut bytes = BASE64.decode(&sealed.ciphertext).unwrap();
        bytes[0] ^= 0xff;
        sealed.ciphertext = BASE64.encode(bytes);

        assert!(matches!(sealer.unseal(&sealed), Err(DomainError::Internal { .. })));
    }

    #[test]
    fn test_wrong_key_fails() {
        let sealed = sealer().seal("secret-password").unwrap();
        let other = PasswordSealer::new(&[9u8; KEY_LENGTH]).unwrap();

        assert!(other.unseal(&sealed).is_err());
    }

    #[test]
    fn test_key_validation() {
        assert!(PasswordSealer::new(&[0u8; 16]).is_err());
        assert!(PasswordSealer::from_base64("%%%").is_err());
        assert!(PasswordSealer::from_base64(&BASE64.encode([1u8; KEY_LENGTH])).is_ok());
        assert!(PasswordSealer::from_config(None).is_ok());
    }
}
