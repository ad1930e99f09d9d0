//! Argon2 implementation of PasswordHasher

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Argon2,
};

use planok::{DomainError, PasswordHasher};

/// Argon2id hasher with default parameters
#[derive(Debug, Default, Clone)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::Repository(format!("password hashing failed: {}", e)))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, DomainError> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| DomainError::Repository(format!("stored hash is malformed: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = Argon2PasswordHasher::new();
        let hash = hasher.hash("Password123").unwrap();

        assert_ne!(hash, "Password123");
        assert!(hash.starts_with("$argon2"));
        assert!(hasher.verify("Password123", &hash).unwrap());
        assert!(!hasher.verify("Password124", &hash).unwrap());
    }

    #[test]
    fn test_malformed_hash() {
        let hasher = Argon2PasswordHasher::new();
        assert!(hasher.verify("Password123", "not-a-hash").is_err());
    }
}
