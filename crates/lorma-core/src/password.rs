//! Password hashing.
//!
//! Passwords are stored as `base64(salt):base64(hash)` where the hash is
//! PBKDF2-HMAC-SHA256 with 65 535 iterations over an 18 byte salt, producing
//! a 600 bit key. The encoded form is always 125 characters long.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use rand::RngCore;
use sha2::Sha256;
use thiserror::Error;

/// Number of PBKDF2 iterations.
pub const ITERATIONS: u32 = 65_535;

/// Salt length in bytes.
pub const SALT_LEN: usize = 18;

/// Derived key length in bytes (600 bits).
pub const KEY_LEN: usize = 75;

const ENCODED_SALT_LEN: usize = 24;
const ENCODED_KEY_LEN: usize = 100;
const SEPARATOR: char = ':';

/// Errors raised when a stored password hash cannot be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordError {
    #[error("Encoded password must have exactly two parts separated by ':'")]
    WrongPartCount,

    #[error("Encoded salt must be 24 characters, got {0}")]
    WrongSaltLength(usize),

    #[error("Encoded hash must be 100 characters, got {0}")]
    WrongHashLength(usize),

    #[error("Invalid base64 in encoded password: {0}")]
    Base64(String),
}

/// Hash `password` with the given salt and return the encoded form.
pub fn encode_password(password: &str, salt: &[u8]) -> String {
    let key = derive_key(password, salt);
    format!("{}{SEPARATOR}{}", BASE64.encode(salt), BASE64.encode(key))
}

/// Hash `password` with a freshly generated random salt.
pub fn new_encoded_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    encode_password(password, &salt)
}

/// Check `password` against a stored encoded hash.
///
/// Returns `Ok(false)` for a wrong password and an error when the stored
/// value is not a well-formed encoding.
pub fn check_password(password: &str, encoded: &str) -> Result<bool, PasswordError> {
    let parts: Vec<&str> = encoded.split(SEPARATOR).collect();
    let [salt_b64, key_b64] = parts.as_slice() else {
        return Err(PasswordError::WrongPartCount);
    };
    if salt_b64.len() != ENCODED_SALT_LEN {
        return Err(PasswordError::WrongSaltLength(salt_b64.len()));
    }
    if key_b64.len() != ENCODED_KEY_LEN {
        return Err(PasswordError::WrongHashLength(key_b64.len()));
    }

    let salt = BASE64
        .decode(salt_b64)
        .map_err(|e| PasswordError::Base64(e.to_string()))?;
    let expected = BASE64
        .decode(key_b64)
        .map_err(|e| PasswordError::Base64(e.to_string()))?;

    let actual = derive_key(password, &salt);
    Ok(constant_time_eq(&actual, &expected))
}

fn derive_key(password: &str, salt: &[u8]) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, ITERATIONS, &mut key);
    key
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    const PASSWORD: &str = "P@ssw0rd";
    const SALT: &[u8] = b"012345678901234567";
    const HASHED_PASSWORD: &str = concat!(
        "MDEyMzQ1Njc4OTAxMjM0NTY3:",
        "QAkP4UwIf5g/rOA5m2T1Co56iMSbDsdPlNf3yhkevscb/oMkMFALVivZlkJRJksNgzNCnGk0v8D0Anxzm6dcueJqZQtbGlJ6e7JX"
    );

    #[test]
    fn test_encode_password_known_vector() {
        assert_eq!(encode_password(PASSWORD, SALT), HASHED_PASSWORD);
    }

    #[test]
    fn test_check_password() {
        assert_eq!(check_password(PASSWORD, HASHED_PASSWORD), Ok(true));
        assert_eq!(check_password("p@ssw0rd", HASHED_PASSWORD), Ok(false));
    }

    #[test]
    fn test_new_encoded_password_round_trips() {
        let encoded = new_encoded_password(PASSWORD);
        assert_eq!(encoded.len(), 125);
        assert_eq!(check_password(PASSWORD, &encoded), Ok(true));
        assert_ne!(encoded, new_encoded_password(PASSWORD));
    }

    #[test]
    fn test_malformed_encodings() {
        assert_eq!(
            check_password(PASSWORD, "no-separator"),
            Err(PasswordError::WrongPartCount)
        );
        assert_eq!(check_password(PASSWORD, "a:b:c"), Err(PasswordError::WrongPartCount));
        assert_eq!(
            check_password(PASSWORD, "short:x"),
            Err(PasswordError::WrongSaltLength(5))
        );
        let bad_hash = format!("{}:{}", &HASHED_PASSWORD[..24], "A".repeat(99));
        assert_eq!(
            check_password(PASSWORD, &bad_hash),
            Err(PasswordError::WrongHashLength(99))
        );
        let bad_base64 = format!("{}:{}", "!".repeat(24), &HASHED_PASSWORD[25..]);
        assert!(matches!(
            check_password(PASSWORD, &bad_base64),
            Err(PasswordError::Base64(_))
        ));
    }
}
