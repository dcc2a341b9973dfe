//! Password verification collaborator.

use argon2::{Argon2, PasswordHasher, PasswordVerifier as _};
use password_hash::{PasswordHash, SaltString};

/// Opaque adaptive-hash comparison.
///
/// The core only ever asks "does this plaintext match this stored hash";
/// hash storage and parameters are the collaborator's business.
pub trait PasswordVerifier: Send + Sync {
    fn verify(&self, plaintext: &str, hash: &str) -> bool;
}

/// Argon2id verifier over PHC-format hash strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Verifier;

impl PasswordVerifier for Argon2Verifier {
    fn verify(&self, plaintext: &str, hash: &str) -> bool {
        if let Ok(parsed) = PasswordHash::new(hash) {
            Argon2::default()
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok()
        } else {
            false
        }
    }
}

/// Hash a plaintext password into a PHC string (store seeding, user admin).
pub fn hash_password(plaintext: &str) -> Result<String, password_hash::Error> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes).map_err(|_| password_hash::Error::Crypto)?;
    let salt = SaltString::encode_b64(&salt_bytes)?;
    let phc = Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)?
        .to_string();
    Ok(phc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_accepts_matching_password() {
        let hash = hash_password("123456").unwrap();
        assert!(Argon2Verifier.verify("123456", &hash));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hash = hash_password("123456").unwrap();
        assert!(!Argon2Verifier.verify("654321", &hash));
    }

    #[test]
    fn verify_rejects_garbage_hash() {
        assert!(!Argon2Verifier.verify("123456", "not-a-phc-string"));
    }
}
