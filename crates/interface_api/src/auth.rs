//! Session tokens and credential hashing

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use core_kernel::{CoreError, CoreResult};
use domain_account::ports::CredentialVerifier;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
}

/// Auth errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
}

/// Mints a session token for a logged-in user
pub fn create_token(
    user_id: &str,
    secret: &str,
    expiration_secs: u64,
) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = SessionClaims {
        sub: user_id.to_string(),
        exp: (now + Duration::seconds(expiration_secs as i64)).timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| AuthError::InvalidToken)
}

/// Validates a session token
pub fn validate_token(token: &str, secret: &str) -> Result<SessionClaims, AuthError> {
    decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })
}

/// Bcrypt-backed credential verifier
#[derive(Debug, Clone)]
pub struct BcryptVerifier {
    cost: u32,
}

impl BcryptVerifier {
    pub fn new() -> Self {
        Self { cost: 10 }
    }
}

impl Default for BcryptVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialVerifier for BcryptVerifier {
    fn hash(&self, password: &str) -> CoreResult<String> {
        bcrypt::hash(password, self.cost)
            .map_err(|e| CoreError::unavailable_from("credential hashing failed", e))
    }

    fn verify(&self, password: &str, credential_ref: &str) -> CoreResult<bool> {
        bcrypt::verify(password, credential_ref)
            .map_err(|e| CoreError::unavailable_from("credential verification failed", e))
    }
}
