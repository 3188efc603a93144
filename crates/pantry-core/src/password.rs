//! Password hashing for stored user accounts.
//!
//! Hashes are salted SHA-256, base64 encoded, the format already present in
//! existing `"User".PasswordHash` rows.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha256};

const SALT: &str = "cheese";

/// Hash a plaintext password for storage.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(SALT.as_bytes());
    STANDARD.encode(hasher.finalize())
}

/// Compare a plaintext password against a stored hash.
pub fn verify_password(password: &str, stored: &str) -> bool {
    hash_password(password) == stored
}
