//! Salted password verifiers.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

/// Number of random salt bytes per credential.
pub const SALT_BYTES: usize = 16;

/// Shortest accepted password, in characters.
pub const MINIMUM_PASSWORD_CHARS: usize = 6;

/// Generate a fresh base64-encoded salt.
#[must_use]
pub fn generate_salt() -> String {
    let mut salt = Zeroizing::new([0_u8; SALT_BYTES]);

    OsRng.fill_bytes(salt.as_mut_slice());

    BASE64.encode(salt.as_slice())
}

/// `base64(sha256(salt || password))`, or `None` when the salt is not valid
/// base64.
#[must_use]
pub fn hash_password(salt: &str, password: &str) -> Option<String> {
    let salt = Zeroizing::new(BASE64.decode(salt).ok()?);

    let mut hasher = Sha256::new();

    hasher.update(salt.as_slice());
    hasher.update(password.as_bytes());

    Some(BASE64.encode(hasher.finalize()))
}

/// Check a password against a stored verifier.
#[must_use]
pub fn verify_password(salt: &str, password: &str, expected_hash: &str) -> bool {
    hash_password(salt, password).is_some_and(|hash| {
        hash.len() == expected_hash.len()
            && hash
                .bytes()
                .zip(expected_hash.bytes())
                .fold(0_u8, |diff, (a, b)| diff | (a ^ b))
                == 0
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn salts_are_random_and_decode_to_salt_bytes() {
        let first = generate_salt();
        let second = generate_salt();

        assert_ne!(first, second);
        assert_eq!(BASE64.decode(&first).map(|s| s.len()).ok(), Some(SALT_BYTES));
    }

    #[test]
    fn correct_password_verifies() {
        let salt = generate_salt();
        let hash = hash_password(&salt, "secret1").unwrap_or_default();

        assert!(verify_password(&salt, "secret1", &hash));
    }

    #[test]
    fn wrong_password_is_rejected() {
        let salt = generate_salt();
        let hash = hash_password(&salt, "secret1").unwrap_or_default();

        assert!(!verify_password(&salt, "secret2", &hash));
    }

    #[test]
    fn same_password_hashes_differently_under_different_salts() {
        assert_ne!(
            hash_password(&generate_salt(), "secret1"),
            hash_password(&generate_salt(), "secret1")
        );
    }

    #[test]
    fn invalid_salt_never_verifies() {
        assert_eq!(hash_password("not base64!", "secret1"), None);
        assert!(!verify_password("not base64!", "secret1", ""));
    }
}
