//! Authentication gateway
//!
//! The only auth interface the protected handlers see. Three interchangeable
//! implementations, one per [`AuthStrategy`], selected at startup.

use crate::{
    auth::{
        authenticator::Authenticator,
        jwt::{SessionToken, TokenIssuer, TokenKeys, TokenValidator},
        middleware::{extract_basic_credentials, extract_token, AuthContext},
        password::PasswordHasher,
        store::CredentialStore,
    },
    config::AppConfig,
    error::{AppError, Challenge},
    models::user::UserRecord,
};
use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};

/// How protected routes authenticate requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthStrategy {
    /// Every request is admitted
    None,
    /// HTTP Basic credentials checked on every request
    Basic,
    /// `POST /token` login, then `Authorization: Bearer`
    Token,
}

impl fmt::Display for AuthStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AuthStrategy::None => "none",
            AuthStrategy::Basic => "basic",
            AuthStrategy::Token => "token",
        };
        f.write_str(name)
    }
}

pub trait AuthGateway: Send + Sync {
    fn strategy(&self) -> AuthStrategy;

    /// Exchange a username/password for a session token.
    ///
    /// Only the token strategy supports this.
    fn login(&self, username: &str, password: &str) -> Result<SessionToken, AppError> {
        let _ = (username, password);
        Err(AppError::NotFound(format!(
            "Token login is not available with the '{}' strategy",
            self.strategy()
        )))
    }

    /// Admit or reject a request based on its headers
    fn authorize(&self, headers: &HeaderMap) -> Result<AuthContext, AppError>;

    /// Whether `authorize` runs a password hash verification
    fn hashes_per_request(&self) -> bool {
        false
    }
}

/// Build the gateway selected by `auth.strategy`
pub fn build_gateway(
    config: &AppConfig,
    hasher: PasswordHasher,
) -> Result<Arc<dyn AuthGateway>, AppError> {
    let gateway: Arc<dyn AuthGateway> = match config.auth.strategy {
        AuthStrategy::None => Arc::new(OpenGateway),
        AuthStrategy::Basic => {
            let store = Arc::new(CredentialStore::from_config(&config.auth)?);
            Arc::new(BasicGateway::new(Authenticator::new(store, hasher)?))
        }
        AuthStrategy::Token => {
            let store = Arc::new(CredentialStore::from_config(&config.auth)?);
            let keys = Arc::new(TokenKeys::from_config(&config.security)?);
            Arc::new(TokenGateway::new(store, hasher, keys)?)
        }
    };

    tracing::info!(strategy = %gateway.strategy(), "Auth gateway initialized");
    Ok(gateway)
}

/// No authentication
pub struct OpenGateway;

impl AuthGateway for OpenGateway {
    fn strategy(&self) -> AuthStrategy {
        AuthStrategy::None
    }

    fn authorize(&self, _headers: &HeaderMap) -> Result<AuthContext, AppError> {
        Ok(AuthContext::anonymous())
    }
}

/// Static credential check on every request
pub struct BasicGateway {
    authenticator: Authenticator,
}

impl BasicGateway {
    pub fn new(authenticator: Authenticator) -> Self {
        Self { authenticator }
    }
}

impl AuthGateway for BasicGateway {
    fn strategy(&self) -> AuthStrategy {
        AuthStrategy::Basic
    }

    fn hashes_per_request(&self) -> bool {
        true
    }

    fn authorize(&self, headers: &HeaderMap) -> Result<AuthContext, AppError> {
        let (username, password) = extract_basic_credentials(headers)?;

        let user = self
            .authenticator
            .authenticate(&username, &password)
            .map_err(|_| AppError::InvalidCredentials(Challenge::Basic))?;

        Ok(AuthContext::from(&user))
    }
}

/// Bearer-token sessions
pub struct TokenGateway {
    authenticator: Authenticator,
    issuer: TokenIssuer,
    validator: TokenValidator,
}

impl TokenGateway {
    pub fn new(
        store: Arc<CredentialStore>,
        hasher: PasswordHasher,
        keys: Arc<TokenKeys>,
    ) -> Result<Self, AppError> {
        Ok(Self {
            authenticator: Authenticator::new(store.clone(), hasher)?,
            issuer: TokenIssuer::new(keys.clone()),
            validator: TokenValidator::new(keys, store),
        })
    }

    /// Authenticate, then mint a token with the configured lifetime
    pub fn require_login(&self, username: &str, password: &str) -> Result<SessionToken, AppError> {
        let user = self.authenticator.authenticate(username, password)?;
        let token = self.issuer.issue(&user, None)?;

        tracing::info!(username = %user.username, "Login succeeded");
        Ok(token)
    }

    /// Resolve a bearer token to its user
    pub fn require_authorized_user(&self, token: &str) -> Result<UserRecord, AppError> {
        self.validator.validate(token).map_err(AppError::from)
    }
}

impl AuthGateway for TokenGateway {
    fn strategy(&self) -> AuthStrategy {
        AuthStrategy::Token
    }

    fn login(&self, username: &str, password: &str) -> Result<SessionToken, AppError> {
        self.require_login(username, password)
    }

    fn authorize(&self, headers: &HeaderMap) -> Result<AuthContext, AppError> {
        let token = extract_token(headers)?;
        let user = self.require_authorized_user(&token)?;
        Ok(AuthContext::from(&user))
    }
}
