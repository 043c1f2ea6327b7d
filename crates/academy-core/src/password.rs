//! Password hashing backed by bcrypt.

use anyhow::anyhow;
use bcrypt::{DEFAULT_COST, hash, verify};

use crate::errors::AppError;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash_password_with_cost(password, DEFAULT_COST)
}

/// Lower costs are only meant for seeding and tests.
pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, AppError> {
    hash(password, cost).map_err(|e| AppError::internal(anyhow!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hashed: &str) -> Result<bool, AppError> {
    verify(password, hashed)
        .map_err(|e| AppError::internal(anyhow!("Failed to verify password: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hashed = hash_password_with_cost("admin123", 4).unwrap();
        assert_ne!(hashed, "admin123");
        assert!(verify_password("admin123", &hashed).unwrap());
        assert!(!verify_password("admin124", &hashed).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password_with_cost("secret", 4).unwrap();
        let b = hash_password_with_cost("secret", 4).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_against_garbage_hash_errors() {
        assert!(verify_password("secret", "not-a-bcrypt-hash").is_err());
    }
}
