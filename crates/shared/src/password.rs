//! Password hashing and policy checks.
//!
//! Hashes use Argon2id and are stored in PHC string format, so the
//! parameters travel with the hash and can be raised later without
//! invalidating existing accounts.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashError(String),

    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,

    #[error("Password must be at least {0} characters")]
    TooShort(usize),

    #[error("Password must be at most {0} characters")]
    TooLong(usize),
}

/// Minimum accepted password length (in characters).
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Upper bound keeps hashing cost bounded for hostile input.
pub const MAX_PASSWORD_LENGTH: usize = 128;

// OWASP 2024 baseline for Argon2id: 19 MiB, 2 iterations, 1 lane.
const MEMORY_COST: u32 = 19456;
const TIME_COST: u32 = 2;
const PARALLELISM: u32 = 1;
const OUTPUT_LEN: usize = 32;

fn argon2_hasher() -> Result<Argon2<'static>, PasswordError> {
    let params = Params::new(MEMORY_COST, TIME_COST, PARALLELISM, Some(OUTPUT_LEN))
        .map_err(|e| PasswordError::HashError(format!("Failed to create Argon2 params: {}", e)))?;

    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Checks the account password policy. Only length is enforced.
pub fn check_password_policy(password: &str) -> Result<(), PasswordError> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LENGTH {
        return Err(PasswordError::TooShort(MIN_PASSWORD_LENGTH));
    }
    if len > MAX_PASSWORD_LENGTH {
        return Err(PasswordError::TooLong(MAX_PASSWORD_LENGTH));
    }
    Ok(())
}

/// Hashes a password with Argon2id and returns the PHC string.
///
/// ```
/// use shared::password::hash_password;
///
/// let hash = hash_password("secret123").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    argon2_hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::HashError(e.to_string()))
}

/// Verifies a password against a stored PHC hash.
///
/// Returns `Ok(false)` for a mismatch and `Err` only when the stored hash
/// itself is unusable.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHashFormat)?;

    // Parameters are read from the PHC string, not from the defaults.
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_uses_argon2id_parameters() {
        let hash = hash_password("secret123").unwrap();
        assert!(hash.starts_with("$argon2id$v=19$m=19456,t=2,p=1$"));
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let first = hash_password("secret123").unwrap();
        let second = hash_password("secret123").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_password_match_and_mismatch() {
        let hash = hash_password("secret123").unwrap();
        assert!(verify_password("secret123", &hash).unwrap());
        assert!(!verify_password("secret124", &hash).unwrap());
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        let result = verify_password("secret123", "plaintext-not-a-hash");
        assert!(matches!(result, Err(PasswordError::InvalidHashFormat)));
    }

    #[test]
    fn test_policy_accepts_eight_characters() {
        assert!(check_password_policy("secret12").is_ok());
        assert!(check_password_policy("secret123").is_ok());
    }

    #[test]
    fn test_policy_rejects_short_and_huge_passwords() {
        assert!(matches!(
            check_password_policy("short"),
            Err(PasswordError::TooShort(8))
        ));
        assert!(matches!(
            check_password_policy(&"x".repeat(129)),
            Err(PasswordError::TooLong(128))
        ));
    }

    #[test]
    fn test_policy_counts_characters_not_bytes() {
        // 8 characters, 16 bytes
        assert!(check_password_policy("ääääääää").is_ok());
    }
}
