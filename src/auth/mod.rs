//! Authentication module
//!
//! Leaf-first: password hashing, credential store, authenticator, token
//! issuer/validator, and the gateway that composes them for the HTTP layer.

pub mod authenticator;
pub mod gateway;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod store;

pub use authenticator::{AuthFailure, Authenticator};
pub use gateway::{build_gateway, AuthGateway, AuthStrategy, BasicGateway, OpenGateway, TokenGateway};
pub use jwt::{Claims, SessionToken, TokenFailure, TokenIssuer, TokenKeys, TokenValidator};
pub use middleware::{extract_basic_credentials, extract_token, require_auth, AuthContext};
pub use password::PasswordHasher;
pub use store::CredentialStore;
