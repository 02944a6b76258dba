//! Authentication for the storefront server.
//!
//! Covers the two credential paths the API exposes:
//!
//! - **Tokens**: signed, time-limited JWTs (HS256 over a single shared
//!   secret) carrying the user identity. Access tokens gate protected
//!   routes; refresh tokens may only be exchanged for new access tokens.
//! - **Passwords**: Argon2id hashing and verification for login.

pub mod config;
pub mod error;
pub mod password;
pub mod token;

pub use config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenKind, TokenService};
