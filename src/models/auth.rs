//! Authentication-related models

use serde::{Deserialize, Serialize};
use std::fmt;

/// `POST /token` form body
#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// `POST /token` response
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    /// seconds until the access token expires
    pub expires_in: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_form_debug_redacts_password() {
        let form = LoginForm {
            username: "alice".to_string(),
            password: "wonderland".to_string(),
        };

        let printed = format!("{:?}", form);
        assert!(printed.contains("alice"));
        assert!(!printed.contains("wonderland"));
    }
}
