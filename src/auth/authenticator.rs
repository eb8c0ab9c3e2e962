//! Username/password verification against the credential store

use crate::{
    auth::{password::PasswordHasher, store::CredentialStore},
    error::AppError,
    models::user::UserRecord,
};
use secrecy::ExposeSecret;
use std::sync::Arc;
use thiserror::Error;

/// Login-time failure. Unknown user, wrong password and disabled account all
/// map to the same variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthFailure {
    #[error("invalid credentials")]
    InvalidCredentials,
}

pub struct Authenticator {
    store: Arc<CredentialStore>,
    hasher: PasswordHasher,
    /// Verified against when the username is unknown, so that path costs
    /// one hash verification like every other.
    dummy_hash: String,
}

impl Authenticator {
    pub fn new(store: Arc<CredentialStore>, hasher: PasswordHasher) -> Result<Self, AppError> {
        let dummy_hash = hasher.hash(&uuid::Uuid::new_v4().to_string())?;

        Ok(Self {
            store,
            hasher,
            dummy_hash,
        })
    }

    pub fn authenticate(&self, username: &str, password: &str) -> Result<UserRecord, AuthFailure> {
        let Some(user) = self.store.lookup(username) else {
            let _ = self.hasher.verify(password, &self.dummy_hash);
            tracing::debug!(username = %username, reason = "unknown_user", "Login rejected");
            return Err(AuthFailure::InvalidCredentials);
        };

        let matches = self
            .hasher
            .verify(password, user.hashed_password.expose_secret());

        if user.disabled {
            tracing::debug!(username = %username, reason = "disabled", "Login rejected");
            return Err(AuthFailure::InvalidCredentials);
        }

        if !matches {
            tracing::debug!(username = %username, reason = "password_mismatch", "Login rejected");
            return Err(AuthFailure::InvalidCredentials);
        }

        Ok(user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;

    fn authenticator(disabled: bool) -> Authenticator {
        let hasher = PasswordHasher::with_params(8, 1, 1).unwrap();
        let user = UserRecord {
            username: "alice".to_string(),
            hashed_password: Secret::new(hasher.hash("wonderland").unwrap()),
            display_name: "Alice".to_string(),
            disabled,
        };

        Authenticator::new(Arc::new(CredentialStore::new([user])), hasher).unwrap()
    }

    #[test]
    fn test_authenticate_success() {
        let user = authenticator(false).authenticate("alice", "wonderland").unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.display_name, "Alice");
    }

    #[test]
    fn test_unknown_user_and_wrong_password_are_indistinguishable() {
        let auth = authenticator(false);

        let unknown = auth.authenticate("nosuchuser", "wonderland").unwrap_err();
        let wrong = auth.authenticate("alice", "wrongpassword").unwrap_err();

        assert_eq!(unknown, AuthFailure::InvalidCredentials);
        assert_eq!(unknown, wrong);
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[test]
    fn test_disabled_account_rejected_as_invalid_credentials() {
        let result = authenticator(true).authenticate("alice", "wonderland");
        assert_eq!(result.unwrap_err(), AuthFailure::InvalidCredentials);
    }

    #[test]
    fn test_username_is_case_sensitive() {
        let result = authenticator(false).authenticate("Alice", "wonderland");
        assert_eq!(result.unwrap_err(), AuthFailure::InvalidCredentials);
    }
}
