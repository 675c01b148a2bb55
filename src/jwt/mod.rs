//! JWT token handling

use crate::config::JwtConfig;
use crate::error::Result;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// The only algorithm accepted when verifying access tokens
pub const ACCESS_TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

/// Access token claims (issued on login)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessClaims {
    /// Subject (user ID as a decimal string)
    #[serde(default)]
    pub sub: String,
    /// User role, e.g. "user" or "admin"
    #[serde(default)]
    pub role: String,
    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// JWT token manager
#[derive(Clone)]
pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtManager {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Create a Validation with a strict leeway (5 seconds) instead of the default 60 seconds.
    /// Pinning the algorithm list to HS256 rejects tokens whose header names anything else.
    fn strict_validation(&self) -> Validation {
        let mut v = Validation::new(ACCESS_TOKEN_ALGORITHM);
        v.leeway = 5;
        v.set_required_spec_claims(&["exp"]);
        v
    }

    /// Create an access token for a user, issued now
    pub fn create_access_token(&self, user_id: i64, role: &str) -> Result<String> {
        self.create_access_token_at(user_id, role, Utc::now())
    }

    /// Create an access token with an explicit issue time
    pub fn create_access_token_at(
        &self,
        user_id: i64,
        role: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<String> {
        let exp = issued_at + Duration::seconds(self.config.access_token_ttl_secs);

        let claims = AccessClaims {
            sub: user_id.to_string(),
            role: role.to_string(),
            iat: issued_at.timestamp(),
            exp: exp.timestamp(),
        };
        let header = Header::new(ACCESS_TOKEN_ALGORITHM);
        Ok(encode(&header, &claims, &self.encoding_key)?)
    }

    /// Verify signature, algorithm and expiry of an access token
    pub fn verify_access_token(
        &self,
        token: &str,
    ) -> std::result::Result<AccessClaims, jsonwebtoken::errors::Error> {
        let token_data = decode::<AccessClaims>(token, &self.decoding_key, &self.strict_validation())?;
        Ok(token_data.claims)
    }

    /// Get token expiration TTL in seconds
    pub fn access_token_ttl(&self) -> i64 {
        self.config.access_token_ttl_secs
    }
}
