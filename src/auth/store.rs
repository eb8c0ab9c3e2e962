//! Read-only credential store holding the configured user

use crate::{config::AuthConfig, error::AppError, models::user::UserRecord};
use std::collections::HashMap;

/// Username → record lookup. Populated once, never mutated.
#[derive(Debug, Default)]
pub struct CredentialStore {
    users: HashMap<String, UserRecord>,
}

impl CredentialStore {
    pub fn new(users: impl IntoIterator<Item = UserRecord>) -> Self {
        Self {
            users: users
                .into_iter()
                .map(|user| (user.username.clone(), user))
                .collect(),
        }
    }

    /// Build the store from the static user configuration
    ///
    /// Returns an empty store when no username is configured (open strategy).
    pub fn from_config(config: &AuthConfig) -> Result<Self, AppError> {
        let Some(username) = config.username.clone() else {
            return Ok(Self::default());
        };

        let hashed_password = config.hashed_password.clone().ok_or_else(|| {
            AppError::Config(format!("No hashed password configured for '{}'", username))
        })?;

        Ok(Self::new([UserRecord {
            username,
            hashed_password,
            display_name: config.display_name.clone(),
            disabled: config.disabled,
        }]))
    }

    /// Exact, case-sensitive lookup
    pub fn lookup(&self, username: &str) -> Option<&UserRecord> {
        self.users.get(username)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
