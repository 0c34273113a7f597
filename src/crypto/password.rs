//! Argon2id password hashing.
//!
//! Hashes are PHC strings (`$argon2id$v=19$...`) carrying their own salt and
//! parameters, so verification needs nothing but the stored string.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::rngs::OsRng;

use super::CryptoError;

#[derive(Clone)]
pub struct CredentialStore {
    /// Hash checked when the account does not exist, so that a miss costs
    /// the same as a wrong password.
    decoy_hash: String,
}

impl CredentialStore {
    pub fn new() -> Result<Self, CryptoError> {
        let decoy_hash = hash_password("decoy-password-never-matches")?;
        Ok(Self { decoy_hash })
    }

    pub fn hash(&self, password: &str) -> Result<String, CryptoError> {
        hash_password(password)
    }

    /// False on mismatch and on an unparsable stored hash.
    pub fn verify(&self, password: &str, stored_hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(stored_hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    /// Burns one verification against the decoy hash. Always false.
    pub fn verify_decoy(&self, password: &str) -> bool {
        self.verify(password, &self.decoy_hash);
        false
    }
}

fn hash_password(password: &str) -> Result<String, CryptoError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CryptoError::Hash(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let store = CredentialStore::new().unwrap();
        let hash = store.hash("pw123").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(store.verify("pw123", &hash));
        assert!(!store.verify("pw124", &hash));
    }

    #[test]
    fn test_same_password_gets_fresh_salt() {
        let store = CredentialStore::new().unwrap();
        let a = store.hash("pw123").unwrap();
        let b = store.hash("pw123").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_garbage_hash_fails_closed() {
        let store = CredentialStore::new().unwrap();
        assert!(!store.verify("pw123", "plaintext-from-a-bad-migration"));
        assert!(!store.verify_decoy("decoy-password-never-matches"));
    }
}
