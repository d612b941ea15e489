//! Salted password digests.
//!
//! Stored form is `salt$digest`, both lower-case hex, where the digest is
//! SHA-256 over the salt bytes followed by the password bytes.

use sha2::{Digest, Sha256};

const SALT_LEN: usize = 16;

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn digest(salt_hex: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt_hex.as_bytes());
    hasher.update(password.as_bytes());
    to_hex(&hasher.finalize())
}

/// Hashes a password with a fresh random salt.
#[must_use]
pub fn hash_password(password: &str) -> String {
    let salt: [u8; SALT_LEN] = rand::random();
    let salt_hex = to_hex(&salt);
    let hashed = digest(&salt_hex, password);
    format!("{salt_hex}${hashed}")
}

/// Checks a password against a stored `salt$digest` string.
///
/// Malformed stored values never verify.
#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_hex, expected)) = stored.split_once('$') else {
        return false;
    };
    if salt_hex.len() != SALT_LEN * 2 {
        return false;
    }
    let actual = digest(salt_hex, password);
    // Compare every byte so timing does not depend on the first mismatch
    actual.len() == expected.len()
        && actual
            .bytes()
            .zip(expected.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}
