//! Credential handling.
//!
//! Admin passwords use Argon2id with a cryptographically random salt,
//! stored as PHC strings so algorithm parameters travel with the hash.
//! Entry passwords are short shared secrets looked up by value alone,
//! so they are stored as deterministic SHA-256 digests usable as a
//! unique index — a database leak exposes neither credential in
//! plaintext.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::Rng;
use sha2::{Digest, Sha256};

/// Characters used in generated entry passwords.
const ENTRY_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Hash a plaintext password using Argon2id with a random salt.
///
/// Returns the PHC-formatted hash string.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC-formatted hash.
///
/// Returns `Ok(true)` on a match, `Ok(false)` on a mismatch.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// SHA-256 hex digest of an entry password — the stored form and the
/// value-only lookup key.
pub fn entry_digest(password: &str) -> String {
    let hash = Sha256::digest(password.as_bytes());
    format!("{hash:x}")
}

/// Generate a random uppercase-alphanumeric entry password.
pub fn generate_entry_password(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| ENTRY_CHARSET[rng.random_range(0..ENTRY_CHARSET.len())] as char)
        .collect()
}
