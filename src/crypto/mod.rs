//! Credential hashing and bearer-token signing.

pub mod password;
pub mod token;

pub use password::CredentialStore;
pub use token::{Claims, TokenError, TokenSigner};

#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("token encoding failed: {0}")]
    Encode(String),
}
