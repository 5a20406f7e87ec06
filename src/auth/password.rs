//! Salted PBKDF2-HMAC-SHA256 password hashes.
//!
//! Encoded as `pbkdf2_sha256$<iterations>$<salt b64>$<hash b64>` so the
//! iteration count can be raised later without invalidating stored hashes.

use base64::{engine::general_purpose::STANDARD, Engine};
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;

const SCHEME: &str = "pbkdf2_sha256";
const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;

pub const DEFAULT_ITERATIONS: u32 = 100_000;
pub const MIN_LENGTH: usize = 6;

fn derive(password: &str, salt: &[u8], iterations: u32) -> [u8; HASH_LEN] {
    let mut out = [0u8; HASH_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut out);
    out
}

pub fn hash_password(password: &str, iterations: u32) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    let hash = derive(password, &salt, iterations);
    format!(
        "{}${}${}${}",
        SCHEME,
        iterations,
        STANDARD.encode(salt),
        STANDARD.encode(hash)
    )
}

/// Check `password` against an encoded hash. Malformed hashes never match.
pub fn verify_password(password: &str, encoded: &str) -> bool {
    let mut parts = encoded.split('$');
    let (Some(SCHEME), Some(iterations), Some(salt), Some(expected), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return false;
    };
    let Ok(iterations) = iterations.parse::<u32>() else {
        return false;
    };
    let (Ok(salt), Ok(expected)) = (STANDARD.decode(salt), STANDARD.decode(expected)) else {
        return false;
    };
    if iterations == 0 || expected.len() != HASH_LEN {
        return false;
    }

    let actual = derive(password, &salt, iterations);
    actual[..].ct_eq(&expected[..]).into()
}

/// Score 0-5: length of at least 8, then one point each for upper case,
/// lower case, digits and other characters.
pub fn password_strength(password: &str) -> u8 {
    let checks = [
        password.chars().count() >= 8,
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| !c.is_ascii_alphanumeric()),
    ];
    checks.iter().filter(|ok| **ok).count() as u8
}
