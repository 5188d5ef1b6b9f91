//! Token service - issues and verifies signed, time-bounded access tokens.
//!
//! Verification is stateless: any holder of the signing secret can check a
//! token, and nothing is revoked before it expires.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{
    Config, ACCESS_TOKEN_KIND, DEFAULT_JWT_EXPIRATION_MINUTES, SECONDS_PER_MINUTE,
    TOKEN_TYPE_BEARER,
};
use crate::errors::{AppError, AppResult, TokenError};

/// JWT claims payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Username the token was issued to
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
    pub nbf: i64,
    pub jti: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Token response returned after successful authentication
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token lifetime in seconds
    #[schema(example = 900)]
    pub expires_in: i64,
}

/// Token service trait for dependency injection.
pub trait TokenService: Send + Sync {
    /// Issue a signed token binding `identity`
    fn issue(&self, identity: &str) -> AppResult<TokenResponse>;

    /// Check signature and expiry, returning the embedded claims
    fn verify(&self, token: &str) -> Result<Claims, TokenError>;
}

/// HS256 implementation keyed by the process-wide secret.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_nbf = true;
        validation.set_required_spec_claims(&["exp", "sub", "nbf"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        // Config bounds the lifetime, so the fallback is never taken in practice
        let ttl = Duration::try_minutes(config.jwt_expiration_minutes)
            .unwrap_or_else(|| Duration::minutes(DEFAULT_JWT_EXPIRATION_MINUTES));
        Self::new(config.jwt_secret_bytes(), ttl)
    }
}

impl TokenService for TokenIssuer {
    fn issue(&self, identity: &str) -> AppResult<TokenResponse> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AppError::internal("Token expiry is out of range"))?;

        let claims = Claims {
            sub: identity.to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
            kind: ACCESS_TOKEN_KIND.to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Token signing failed: {}", e)))?;

        Ok(TokenResponse {
            access_token: token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.ttl.num_minutes() * SECONDS_PER_MINUTE,
        })
    }

    fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            }
        })?;

        if data.claims.kind != ACCESS_TOKEN_KIND {
            return Err(TokenError::Malformed);
        }

        Ok(data.claims)
    }
}
