//! Password Hasher Port
//!
//! One-way hashing for stored credentials.

use crate::domain::errors::DomainError;

/// Service interface for hashing and verifying passwords
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password into a self-describing hash string
    fn hash(&self, password: &str) -> Result<String, DomainError>;

    /// Check a plaintext password against a stored hash
    fn verify(&self, password: &str, hash: &str) -> Result<bool, DomainError>;
}
