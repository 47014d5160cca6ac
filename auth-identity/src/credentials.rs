//! Credential material: salted password hashes and random API tokens.

use crate::{config::IdentityConfig, error::*};
use rand::RngCore;
use tracing::debug;

/// Hashes and verifies passwords with bcrypt.
#[derive(Debug, Clone)]
pub struct CredentialHasher {
    cost: u32,
    token_bytes: usize,
}

impl CredentialHasher {
    pub fn new(config: &IdentityConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            cost: config.bcrypt_cost,
            token_bytes: config.token_bytes,
        })
    }

    pub fn hash_password(&self, password: &str) -> Result<String> {
        debug!(cost = self.cost, "Hashing password");
        bcrypt::hash(password, self.cost).map_err(|e| IdentityError::HashingError(e.to_string()))
    }

    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool> {
        bcrypt::verify(password, hash).map_err(|e| IdentityError::HashingError(e.to_string()))
    }

    pub fn generate_token(&self) -> String {
        generate_token(self.token_bytes)
    }
}

/// Hex-encoded token drawn from the thread-local CSPRNG.
pub fn generate_token(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rand::thread_rng().fill_bytes(&mut buf);
    hex::encode(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_hasher() -> CredentialHasher {
        CredentialHasher::new(&IdentityConfig {
            bcrypt_cost: 4,
            token_bytes: 16,
        })
        .unwrap()
    }

    #[test]
    fn test_hash_is_salted_and_verifiable() {
        let hasher = fast_hasher();
        let first = hasher.hash_password("123456").unwrap();
        let second = hasher.hash_password("123456").unwrap();

        assert_ne!(first, "123456");
        assert_ne!(first, second);
        assert!(hasher.verify_password("123456", &first).unwrap());
        assert!(!hasher.verify_password("654321", &first).unwrap());
    }

    #[test]
    fn test_tokens_are_random_hex() {
        let hasher = fast_hasher();
        let a = hasher.generate_token();
        let b = hasher.generate_token();

        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_rejects_out_of_range_cost() {
        let config = IdentityConfig {
            bcrypt_cost: 2,
            token_bytes: 16,
        };
        assert!(matches!(
            CredentialHasher::new(&config),
            Err(IdentityError::InvalidConfiguration(_))
        ));
    }
}
