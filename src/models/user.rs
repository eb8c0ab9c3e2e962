//! User domain models

use secrecy::Secret;
use serde::Serialize;

/// The single statically-configured account.
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub username: String,
    pub hashed_password: Secret<String>,
    pub display_name: String,
    pub disabled: bool,
}

/// User response DTO (never carries the password hash)
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserResponse {
    pub username: String,
    pub display_name: String,
}

impl From<&UserRecord> for UserResponse {
    fn from(user: &UserRecord) -> Self {
        Self {
            username: user.username.clone(),
            display_name: user.display_name.clone(),
        }
    }
}
