//! Self-contained, time-limited bearer tokens.
//!
//! Format: `base64url(claims_json) "." base64url(mac)` where the MAC is a
//! keyed BLAKE2b-512 over the encoded claims. The key is derived from the
//! configured secret. There is no server-side session table: a token stays
//! valid until `exp`.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use blake2::digest::Mac;
use blake2::{Blake2b512, Blake2bMac512, Digest as Blake2Digest};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::CryptoError;
use crate::models::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id, as a string.
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn user_id(&self) -> Option<UserId> {
        self.sub.parse().ok()
    }
}

/// Why a token was refused. Only ever logged; callers see one outcome.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("bad signature")]
    BadSignature,
    #[error("token expired")]
    Expired,
}

#[derive(Clone)]
pub struct TokenSigner {
    key: [u8; 64],
    ttl: Duration,
}

impl TokenSigner {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let digest = Blake2b512::digest(secret.as_bytes());
        let mut key = [0u8; 64];
        key.copy_from_slice(&digest);
        Self { key, ttl }
    }

    pub fn issue(&self, user_id: UserId) -> Result<String, CryptoError> {
        self.issue_at(user_id, Utc::now())
    }

    pub fn issue_at(&self, user_id: UserId, now: DateTime<Utc>) -> Result<String, CryptoError> {
        let expires = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| CryptoError::Encode("token expiry out of range".to_string()))?;
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: expires.timestamp(),
        };
        let json = serde_json::to_vec(&claims).map_err(|e| CryptoError::Encode(e.to_string()))?;
        let payload = URL_SAFE_NO_PAD.encode(json);
        let signature = URL_SAFE_NO_PAD.encode(self.sign(payload.as_bytes())?);
        Ok(format!("{}.{}", payload, signature))
    }

    #[cfg(test)]
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let (payload, signature) = token.split_once('.').ok_or(TokenError::Malformed)?;
        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| TokenError::Malformed)?;

        let mut mac = self.mac().map_err(|_| TokenError::BadSignature)?;
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::BadSignature)?;

        let json = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| TokenError::Malformed)?;
        let claims: Claims = serde_json::from_slice(&json).map_err(|_| TokenError::Malformed)?;

        if now.timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }

    fn mac(&self) -> Result<Blake2bMac512, CryptoError> {
        Blake2bMac512::new_from_slice(&self.key).map_err(|e| CryptoError::Encode(e.to_string()))
    }

    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mut mac = self.mac()?;
        mac.update(payload);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> TokenSigner {
        TokenSigner::new("test-secret", Duration::days(7))
    }

    #[test]
    fn test_issue_then_verify() {
        let signer = signer();
        let token = signer.issue(42).unwrap();
        let claims = signer.verify(&token).unwrap();

        assert_eq!(claims.user_id(), Some(42));
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 3600);
    }

    #[test]
    fn test_expiry_is_exclusive() {
        let signer = signer();
        let issued = Utc::now();
        let token = signer.issue_at(1, issued).unwrap();

        let just_before = issued + Duration::days(7) - Duration::seconds(1);
        assert!(signer.verify_at(&token, just_before).is_ok());
        assert_eq!(
            signer.verify_at(&token, issued + Duration::days(7)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_other_secret_rejected() {
        let token = signer().issue(1).unwrap();
        let other = TokenSigner::new("another-secret", Duration::days(7));
        assert_eq!(other.verify(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let signer = signer();
        let token = signer.issue(1).unwrap();
        let (_, signature) = token.split_once('.').unwrap();

        let forged_claims = Claims {
            sub: "2".to_string(),
            iat: 0,
            exp: i64::MAX,
        };
        let forged_payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged_claims).unwrap());
        let forged = format!("{}.{}", forged_payload, signature);

        assert_eq!(signer.verify(&forged), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_expiry_overflow_is_an_error() {
        let signer = TokenSigner::new("test-secret", Duration::days(100_000_000));
        let err = signer.issue(1).unwrap_err();
        assert!(matches!(err, CryptoError::Encode(_)));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let signer = signer();
        assert_eq!(signer.verify("no-dot-here"), Err(TokenError::Malformed));
        assert_eq!(signer.verify("abc.!!!"), Err(TokenError::Malformed));
    }
}
