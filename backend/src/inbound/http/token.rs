//! Bearer-token encoding and verification.
//!
//! Tokens are signed JWTs carrying the account id as the subject claim.
//! Secret and algorithm come from configuration so deployments can
//! rotate either without code changes.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Error;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    iat: i64,
    exp: i64,
}

/// Signing settings for issued tokens.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub secret: String,
    pub algorithm: Algorithm,
    pub ttl_minutes: i64,
}

impl TokenConfig {
    /// HS256 with the given secret and a 30 minute lifetime.
    pub fn hs256(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            algorithm: Algorithm::HS256,
            ttl_minutes: 30,
        }
    }

    /// Override the token lifetime.
    #[must_use]
    pub fn with_ttl_minutes(mut self, minutes: i64) -> Self {
        self.ttl_minutes = minutes;
        self
    }
}

/// Issues and verifies bearer tokens.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    header: Header,
    validation: Validation,
    ttl: Duration,
}

impl TokenCodec {
    /// Build a codec from signing settings.
    pub fn new(config: &TokenConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            header: Header::new(config.algorithm),
            validation: Validation::new(config.algorithm),
            ttl: Duration::minutes(config.ttl_minutes),
        }
    }

    /// Issue a token for the given account.
    pub fn issue(&self, user_id: Uuid) -> Result<String, Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&self.header, &claims, &self.encoding)
            .map_err(|err| Error::internal(format!("token signing failed: {err}")))
    }

    /// Verify a token and return its subject.
    ///
    /// Signature, structure, and expiry failures all map to the same
    /// unauthorized error.
    pub fn verify(&self, token: &str) -> Result<Uuid, Error> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims.sub)
            .map_err(|_| Error::unauthorized("Could not validate credentials"))
    }
}
