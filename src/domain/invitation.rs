//! Invitation tokens.
//!
//! The plaintext token goes out in the activation email and nowhere else.
//! Storage only ever sees its SHA-256 digest, hex encoded, which doubles as
//! the lookup key for activation.

use argon2::password_hash::rand_core::{OsRng, RngCore};
use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};

use crate::config::ACTIVATION_TOKEN_BYTES;

/// Plaintext activation token. Debug output never shows the value.
#[derive(Clone, PartialEq, Eq)]
pub struct ActivationToken(String);

impl ActivationToken {
    /// Fresh token from the OS CSPRNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; ACTIVATION_TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    pub fn lookup_hash(&self) -> String {
        lookup_hash(&self.0)
    }
}

impl std::fmt::Debug for ActivationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ActivationToken([REDACTED])")
    }
}

/// Hex-encoded SHA-256 of a plaintext token.
pub fn lookup_hash(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Stored invitation row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invitation {
    pub token_hash: String,
    pub user_id: i64,
    pub expiration: DateTime<Utc>,
}

impl Invitation {
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.expiration > now
    }
}

/// A freshly minted token together with what gets persisted for it.
#[derive(Debug, Clone)]
pub struct IssuedInvitation {
    pub token: ActivationToken,
    pub lookup_hash: String,
    pub expires_at: DateTime<Utc>,
}

impl IssuedInvitation {
    /// `expires_at` is exactly `now + validity`.
    pub fn issue(validity: Duration, now: DateTime<Utc>) -> Self {
        let token = ActivationToken::generate();
        let lookup_hash = token.lookup_hash();
        Self {
            token,
            lookup_hash,
            expires_at: now + validity,
        }
    }
}
