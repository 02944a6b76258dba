//! JWT issuing and verification.
//!
//! Tokens are HS256-signed with a single shared secret. Every token carries
//! a [`TokenKind`]; verification is kind-scoped so a refresh token can never
//! pass an access-token gate or vice versa.

use std::fmt;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};

/// Fixed refresh-token lifetime: 7 days.
pub const DEFAULT_REFRESH_TTL_SECS: u64 = 60 * 60 * 24 * 7;

/// What a token is good for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Grants access to protected routes.
    Access,
    /// May only be exchanged for a new access token.
    Refresh,
}

impl TokenKind {
    /// Returns the kind name as embedded in the claims.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The claims set embedded in every token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject: the user id.
    pub sub: Uuid,

    /// The user's email, for logging and convenience lookups.
    pub email: String,

    /// Token kind (access or refresh).
    pub kind: TokenKind,

    /// Issued at (Unix timestamp).
    pub iat: i64,

    /// Expiration time (Unix timestamp).
    pub exp: i64,
}

/// Issues and verifies tokens against one shared secret.
///
/// Thread-safe (`Send + Sync`); wrap in an `Arc` and share across tasks.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl_secs: u64,
    refresh_ttl_secs: u64,
}

impl TokenService {
    /// Creates a token service.
    ///
    /// `access_ttl_secs` comes from configuration; `refresh_ttl_secs` is
    /// normally [`DEFAULT_REFRESH_TTL_SECS`].
    #[must_use]
    pub fn new(secret: &str, access_ttl_secs: u64, refresh_ttl_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl_secs,
            refresh_ttl_secs,
        }
    }

    /// Issues an access token for the given user.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn issue_access(&self, user_id: Uuid, email: &str) -> AuthResult<String> {
        self.issue(user_id, email, TokenKind::Access, self.access_ttl_secs)
    }

    /// Issues a refresh token for the given user.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn issue_refresh(&self, user_id: Uuid, email: &str) -> AuthResult<String> {
        self.issue(user_id, email, TokenKind::Refresh, self.refresh_ttl_secs)
    }

    fn issue(&self, user_id: Uuid, email: &str, kind: TokenKind, ttl_secs: u64) -> AuthResult<String> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            kind,
            iat: now,
            exp: now + ttl_secs as i64,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            AuthError::Encoding {
                message: e.to_string(),
            }
        })
    }

    /// Verifies an access token and returns its claims.
    ///
    /// # Errors
    ///
    /// Rejects tokens with a bad signature, past expiry, or a kind other
    /// than [`TokenKind::Access`].
    pub fn verify_access(&self, token: &str) -> AuthResult<Claims> {
        self.verify(token, TokenKind::Access)
    }

    /// Verifies a refresh token and returns its claims.
    ///
    /// # Errors
    ///
    /// Rejects tokens with a bad signature, past expiry, or a kind other
    /// than [`TokenKind::Refresh`].
    pub fn verify_refresh(&self, token: &str) -> AuthResult<Claims> {
        self.verify(token, TokenKind::Refresh)
    }

    fn verify(&self, token: &str, expected: TokenKind) -> AuthResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // No audience claim is issued.
        validation.validate_aud = false;

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(AuthError::from)?
            .claims;

        if claims.kind != expected {
            return Err(AuthError::WrongKind {
                expected: expected.as_str(),
            });
        }

        Ok(claims)
    }
}
