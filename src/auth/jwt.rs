//! Signed token pairs for API authentication.
//!
//! Access and refresh tokens are HS256 JWTs over the same process-wide
//! secret, differing only in lifetime. Claims carry the numeric user ID and
//! role ID so the middleware can authorize without a database round trip.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::auth::models::AuthError;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    #[serde(rename = "userID")]
    pub user_id: i64,
    #[serde(rename = "userRoleID")]
    pub user_role_id: i64,
    pub exp: i64,
}

/// A freshly issued access/refresh token pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Identity claims extracted from a verified token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifiedClaims {
    pub user_id: i64,
    pub user_role_id: i64,
}

/// Issues and verifies signed token pairs.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenCodec {
    /// Create a new codec with the given secret and token lifetimes (hours).
    pub fn new(secret: &[u8], access_ttl_hours: i64, refresh_ttl_hours: i64) -> Self {
        let mut validation = Validation::default();
        // Claims carry no audience; only signature and expiry are checked.
        validation.validate_aud = false;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            access_ttl: Duration::hours(access_ttl_hours),
            refresh_ttl: Duration::hours(refresh_ttl_hours),
        }
    }

    /// Issue an access/refresh pair for the given identity.
    pub fn issue(&self, user_id: i64, user_role_id: i64) -> Result<TokenPair, AuthError> {
        let now = Utc::now();

        let access_claims = Claims {
            user_id,
            user_role_id,
            exp: (now + self.access_ttl).timestamp(),
        };
        let refresh_claims = Claims {
            user_id,
            user_role_id,
            exp: (now + self.refresh_ttl).timestamp(),
        };

        let access_token = encode(&Header::default(), &access_claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))?;
        let refresh_token = encode(&Header::default(), &refresh_claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))?;

        Ok(TokenPair { access_token, refresh_token })
    }

    /// Verify a token's signature and expiry and return its identity claims.
    pub fn verify(&self, token: &str) -> Result<VerifiedClaims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::MalformedToken,
            }
        })?;

        Ok(VerifiedClaims {
            user_id: data.claims.user_id,
            user_role_id: data.claims.user_role_id,
        })
    }
}
