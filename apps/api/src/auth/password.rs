//! Argon2 password hashing with per-hash salts.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::errors::AppError;

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Hash used for the dummy verification on login when the email is unknown,
/// so the request does comparable work either way.
pub const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$V1zrNSA5u4BY2WbfSD0U/UZHqmW7fz2noSrH9s9kaXI";

/// Validates length and hashes a plaintext password.
pub fn hash_password(plain: &str) -> Result<String, AppError> {
    if plain.len() < MIN_PASSWORD_LENGTH {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hash failed: {e}")))?;
    Ok(hash.to_string())
}

/// Verifies a plaintext password against a stored hash.
/// Malformed hashes verify as false rather than erroring.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(plain.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash));
        assert!(!verify_password("wrong password", &hash));
    }

    #[test]
    fn test_same_password_different_salts() {
        let h1 = hash_password("samepassword").unwrap();
        let h2 = hash_password("samepassword").unwrap();
        assert_ne!(h1, h2);
        assert!(verify_password("samepassword", &h1));
        assert!(verify_password("samepassword", &h2));
    }

    #[test]
    fn test_too_short_rejected() {
        assert!(hash_password("short").is_err());
    }

    #[test]
    fn test_minimum_length_accepted() {
        assert!(hash_password("12345678").is_ok());
    }

    #[test]
    fn test_malformed_hash_verifies_false() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn test_dummy_hash_never_matches() {
        assert!(!verify_password("password123", DUMMY_HASH));
    }
}
