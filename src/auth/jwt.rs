//! JWT session token issuance and validation
//! Single short-lived access token; no refresh tokens, no server-side state

use crate::{
    auth::store::CredentialStore, config::SecurityConfig, error::AppError,
    models::user::UserRecord,
};
use chrono::{DateTime, Duration, SubsecRound, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};
use thiserror::Error;
use uuid::Uuid;

/// Minimum HMAC secret length in bytes
pub const MIN_SECRET_LEN: usize = 32;

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,

    /// Issued at
    pub iat: i64,

    /// Expiration
    pub exp: i64,

    /// JWT ID (unique token identifier)
    pub jti: String,
}

/// Request-time token failure. All four collapse into one 401 externally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenFailure {
    #[error("malformed token")]
    MalformedToken,
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("unknown token subject")]
    UnknownSubject,
}

/// Parse a configured algorithm name. Only HMAC algorithms are accepted.
pub fn parse_algorithm(name: &str) -> Result<Algorithm, AppError> {
    match name.to_ascii_uppercase().as_str() {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        _ => Err(AppError::Config(format!(
            "Unsupported JWT algorithm: {}. Must be one of: HS256, HS384, HS512",
            name
        ))),
    }
}

/// Signing material shared by [`TokenIssuer`] and [`TokenValidator`]
pub struct TokenKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    validation: Validation,
    lifetime: Duration,
}

impl TokenKeys {
    pub fn new(secret: &str, algorithm: Algorithm, lifetime: Duration) -> Result<Self, AppError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(AppError::Config(format!(
                "JWT secret too short (min {} chars)",
                MIN_SECRET_LEN
            )));
        }

        // exp is checked against the caller's clock in validate_at, with no leeway
        let mut validation = Validation::new(algorithm);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm,
            validation,
            lifetime,
        })
    }

    /// Create keys from config
    pub fn from_config(config: &SecurityConfig) -> Result<Self, AppError> {
        let secret = config
            .jwt_secret
            .as_ref()
            .ok_or_else(|| AppError::Config("JWT secret not configured".to_string()))?;
        let algorithm = parse_algorithm(&config.jwt_algorithm)?;
        let lifetime = Duration::minutes(config.access_token_expire_minutes as i64);

        Self::new(secret.expose_secret(), algorithm, lifetime)
    }
}

/// An issued bearer token plus the times it encodes
#[derive(Clone)]
pub struct SessionToken {
    pub subject: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    token: String,
}

impl SessionToken {
    /// The encoded JWT, safe to put in `Authorization: Bearer`
    pub fn as_str(&self) -> &str {
        &self.token
    }

    pub fn into_string(self) -> String {
        self.token
    }

    /// Seconds between issuance and expiry
    pub fn expires_in_secs(&self) -> u64 {
        (self.expires_at - self.issued_at).num_seconds().max(0) as u64
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionToken")
            .field("subject", &self.subject)
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Mints signed, expiring session tokens
pub struct TokenIssuer {
    keys: Arc<TokenKeys>,
}

impl TokenIssuer {
    pub fn new(keys: Arc<TokenKeys>) -> Self {
        Self { keys }
    }

    /// Issue a token for `user`; `None` uses the configured lifetime
    pub fn issue(
        &self,
        user: &UserRecord,
        lifetime: Option<Duration>,
    ) -> Result<SessionToken, AppError> {
        self.issue_at(user, lifetime, Utc::now())
    }

    pub fn issue_at(
        &self,
        user: &UserRecord,
        lifetime: Option<Duration>,
        now: DateTime<Utc>,
    ) -> Result<SessionToken, AppError> {
        // JWT timestamps are whole seconds
        let issued_at = now.trunc_subsecs(0);
        let expires_at = issued_at + lifetime.unwrap_or(self.keys.lifetime);

        let claims = Claims {
            sub: user.username.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(self.keys.algorithm), &claims, &self.keys.encoding_key)
            .map_err(|e| {
                tracing::error!("Failed to encode access token: {:?}", e);
                AppError::Internal(format!("Failed to encode access token: {}", e))
            })?;

        tracing::debug!(subject = %claims.sub, exp = claims.exp, "Access token issued");

        Ok(SessionToken {
            subject: claims.sub,
            issued_at,
            expires_at,
            token,
        })
    }
}

/// Verifies signature and expiry, then resolves the subject
pub struct TokenValidator {
    keys: Arc<TokenKeys>,
    store: Arc<CredentialStore>,
}

impl TokenValidator {
    pub fn new(keys: Arc<TokenKeys>, store: Arc<CredentialStore>) -> Self {
        Self { keys, store }
    }

    pub fn validate(&self, token: &str) -> Result<UserRecord, TokenFailure> {
        self.validate_at(token, Utc::now())
    }

    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<UserRecord, TokenFailure> {
        let claims = self.decode(token)?;

        let expires_at =
            DateTime::from_timestamp(claims.exp, 0).ok_or(TokenFailure::MalformedToken)?;
        if now > expires_at {
            tracing::debug!(subject = %claims.sub, exp = claims.exp, "Token expired");
            return Err(TokenFailure::Expired);
        }

        match self.store.lookup(&claims.sub) {
            Some(user) if !user.disabled => Ok(user.clone()),
            _ => {
                tracing::debug!(subject = %claims.sub, "Token subject not found");
                Err(TokenFailure::UnknownSubject)
            }
        }
    }

    /// Decode and verify the signature, without checking expiry or subject
    pub fn decode(&self, token: &str) -> Result<Claims, TokenFailure> {
        decode::<Claims>(token, &self.keys.decoding_key, &self.keys.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                let failure = match e.kind() {
                    ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                        TokenFailure::InvalidSignature
                    }
                    ErrorKind::ExpiredSignature => TokenFailure::Expired,
                    _ => TokenFailure::MalformedToken,
                };
                tracing::debug!(error = ?e, failure = %failure, "Token validation failed");
                failure
            })
    }
}
