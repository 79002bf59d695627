//! Password value object - Domain layer password handling.
//!
//! Argon2id with a fresh random salt per hash. The plaintext only lives for
//! the duration of the call that hashes or verifies it.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::config::MIN_PASSWORD_LENGTH;
use crate::errors::{AppError, AppResult};

/// Password value object that handles hashing and verification.
#[derive(Clone)]
pub struct Password {
    hash: String,
}

// Don't expose hash in debug output
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Create a new password by hashing the plain text.
    ///
    /// # Errors
    /// Returns a validation error if the password is too short, and
    /// `AppError::Hashing` if the hasher itself fails.
    pub fn new(plain_text: &str) -> AppResult<Self> {
        if plain_text.len() < MIN_PASSWORD_LENGTH {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        let hash = Self::hash(plain_text)?;
        Ok(Self { hash })
    }

    /// Create a Password from an existing hash (from database).
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    /// Get the hash string for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Consume and return the hash string.
    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify a plain text password against this hash.
    pub fn verify(&self, plain_text: &str) -> bool {
        Self::verify_hash(plain_text, &self.hash).unwrap_or(false)
    }

    fn hash(plain_text: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::argon2()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::Hashing(e.to_string()))?;
        Ok(hash.to_string())
    }

    fn verify_hash(plain_text: &str, hash: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(hash).map_err(|e| AppError::Hashing(e.to_string()))?;
        Ok(Self::argon2()
            .verify_password(plain_text.as_bytes(), &parsed)
            .is_ok())
    }

    #[inline]
    fn argon2() -> Argon2<'static> {
        Argon2::default()
    }
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Password {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_and_verify() {
        let plain = "SecurePassword123!";
        let password = Password::new(plain).unwrap();

        assert!(password.verify(plain));
        assert!(!password.verify("WrongPassword123"));
    }

    #[test]
    fn test_password_from_hash() {
        let plain = "TestPassword123";
        let password = Password::new(plain).unwrap();
        let hash = password.as_str().to_string();

        let restored = Password::from_hash(hash);
        assert!(restored.verify(plain));
    }

    #[test]
    fn test_same_password_different_salts() {
        let plain = "SamePassword123";
        let pass1 = Password::new(plain).unwrap();
        let pass2 = Password::new(plain).unwrap();

        assert_ne!(pass1.as_str(), pass2.as_str());
        assert!(pass1.verify(plain));
        assert!(pass2.verify(plain));
    }

    #[test]
    fn test_hash_never_contains_plaintext() {
        let plain = "PlaintextMarker99";
        let password = Password::new(plain).unwrap();

        assert!(!password.as_str().contains(plain));
        assert!(password.as_str().starts_with("$argon2id$"));
    }

    #[test]
    fn test_password_too_short() {
        let result = Password::new("short");
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_garbage_hash_never_verifies() {
        let stored = Password::from_hash("not-a-phc-string".to_string());
        assert!(!stored.verify("anything"));
    }

    #[test]
    fn test_debug_is_redacted() {
        let password = Password::new("DebugPassword1").unwrap();
        assert!(!format!("{:?}", password).contains("argon2"));
    }
}
