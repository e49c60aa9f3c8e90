//! One-way salted password hashing. The salt is randomized per call, so
//! repeated hashes of the same plaintext differ while all remain
//! verifiable. Argon2's default parameters put a single verification in
//! the tens of milliseconds on commodity hardware.

use anyhow::{anyhow, Result};
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand_core::OsRng;

pub fn hash(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|digest| digest.to_string())
        .map_err(|err| anyhow!("failed to hash password: {err}"))
}

/// Returns whether `password` matches `digest`. A malformed digest is
/// treated as a mismatch, never an error.
pub fn verify(password: &str, digest: &str) -> bool {
    match PasswordHash::new(digest) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
