//! JWT credential codec
//!
//! HS256 tokens carrying `{user_id, roles, iat, exp, jti}`. Expiry is checked
//! against the injected [`Clock`] rather than the library's wall clock.

use std::sync::Arc;

use account_core::{Clock, Credential, CredentialCodec, DomainError, RoleSet, TokenPayload};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject user id
    pub user_id: Uuid,
    /// Role set at issuance; unknown role names fail to decode
    pub roles: RoleSet,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Unique token id, keeps same-second credentials distinct
    pub jti: Uuid,
}

/// JWT service for encoding and decoding credentials
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl JwtService {
    /// Create a new JWT service with the given secret and clock
    #[must_use]
    pub fn new(secret: &str, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            clock,
        }
    }

    /// Decode and verify the signature of a token without checking expiry
    ///
    /// # Errors
    /// Returns `InvalidToken` if the signature or structure is wrong
    pub fn decode_claims(&self, token: &str) -> Result<Claims, DomainError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| DomainError::InvalidToken(e.to_string()))
    }
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>, DomainError> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| DomainError::InvalidToken(format!("timestamp out of range: {secs}")))
}

impl CredentialCodec for JwtService {
    fn issue(&self, payload: &TokenPayload, ttl: Duration) -> Result<Credential, DomainError> {
        let issued_at = timestamp(self.clock.now().timestamp())
            .map_err(|e| DomainError::InternalError(e.to_string()))?;
        let expires_at = issued_at.checked_add_signed(ttl).ok_or_else(|| {
            DomainError::InternalError(format!("Token lifetime out of range: {ttl}"))
        })?;

        let claims = Claims {
            user_id: payload.user_id,
            roles: payload.roles.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4(),
        };

        let value = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| DomainError::InternalError(format!("Failed to encode JWT: {e}")))?;

        Ok(Credential {
            value,
            payload: payload.clone(),
            expires_at,
            issued_at,
        })
    }

    fn introspect(&self, raw: &str) -> Result<Credential, DomainError> {
        let claims = self.decode_claims(raw)?;
        let expires_at = timestamp(claims.exp)?;
        let issued_at = timestamp(claims.iat)?;

        if self.clock.now() >= expires_at {
            return Err(DomainError::TokenExpired);
        }

        Ok(Credential {
            value: raw.to_string(),
            payload: TokenPayload::new(claims.user_id, claims.roles),
            expires_at,
            issued_at,
        })
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService").finish_non_exhaustive()
    }
}
