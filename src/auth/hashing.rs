//! Password hashing with bcrypt.

use crate::errors::{Error, Result};

/// One-way password hasher. The cost factor is process-wide configuration,
/// injected once at startup.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a plaintext password. An empty password is rejected before it
    /// reaches bcrypt.
    pub fn hash(&self, password: &str) -> Result<String> {
        if password.is_empty() {
            return Err(Error::validation("password cannot be an empty string"));
        }

        bcrypt::hash(password, self.cost)
            .map_err(|e| Error::internal(format!("Failed to hash password: {}", e)))
    }

    /// Verify a plaintext password against a stored hash. A mismatch or an
    /// unparseable hash both read as `false`, never as an error.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        bcrypt::verify(password, hash).unwrap_or(false)
    }
}
