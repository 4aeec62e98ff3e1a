//! Password hashing and session token generation.
//!
//! Passwords are hashed with Argon2id and a per-hash random salt, stored in
//! PHC string format. Session tokens are 256-bit random values with a
//! `sess_` prefix.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use rand::Rng;

/// Generates a new session token.
///
/// Format: `sess_{64 hex characters}` (69 characters total).
pub fn generate_session_token() -> String {
    let bytes: [u8; 32] = rand::thread_rng().r#gen();
    format!("sess_{}", hex::encode(bytes))
}

/// Hashes a password for storage using Argon2id with a random salt.
///
/// Returns a PHC-formatted hash string.
///
/// # Errors
///
/// Returns `argon2::password_hash::Error` if hashing fails (rare).
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verifies a password against a stored Argon2 hash.
///
/// Returns `Ok(true)` on a match, `Ok(false)` on a mismatch. Errors only
/// when the stored hash is not valid PHC format.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    let result = Argon2::default().verify_password(password.as_bytes(), &parsed_hash);
    Ok(result.is_ok())
}
