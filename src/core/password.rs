//! PBKDF2 password hashing for stored accounts

use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::Sha256;
use subtle::ConstantTimeEq;

pub const SALT_LEN: usize = 16;
pub const KEY_LEN: usize = 32;

/// Base64-encoded hash and salt, as stored on a user record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash {
    pub hash: String,
    pub salt: String,
}

fn derive_key(password: &str, salt: &[u8], iterations: u32) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut key);
    key
}

/// Hash a password with a fresh random salt
pub fn hash_password(password: &str, iterations: u32) -> PasswordHash {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    let key = derive_key(password, &salt, iterations);
    PasswordHash {
        hash: B64.encode(key),
        salt: B64.encode(salt),
    }
}

/// Check a password against a stored hash and salt
///
/// Undecodable stored values never match.
pub fn verify_password(password: &str, hash: &str, salt: &str, iterations: u32) -> bool {
    let (Ok(expected), Ok(salt)) = (B64.decode(hash), B64.decode(salt)) else {
        return false;
    };
    let key = derive_key(password, &salt, iterations);

    // ct_eq on slices of different lengths is false without inspecting bytes
    expected.as_slice().ct_eq(&key[..]).into()
}
