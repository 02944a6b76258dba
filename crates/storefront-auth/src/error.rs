//! Authentication error types.

/// Errors that can occur while issuing or verifying credentials.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The token is malformed or could not be decoded.
    #[error("Invalid token: {message}")]
    InvalidToken {
        /// Description of why the token is invalid.
        message: String,
    },

    /// The token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// The token signature does not match the shared secret.
    #[error("Invalid signature")]
    InvalidSignature,

    /// The token carries the wrong kind for this operation, e.g. a refresh
    /// token presented to an access-token gate.
    #[error("Wrong token kind: expected {expected}")]
    WrongKind {
        /// The kind this operation requires.
        expected: &'static str,
    },

    /// Failed to encode a token.
    #[error("Failed to encode token: {message}")]
    Encoding {
        /// Description of the encoding error.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `InvalidToken` error.
    #[must_use]
    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::InvalidToken {
            message: message.into(),
        }
    }

    /// Returns `true` if verification failed because of the token itself
    /// rather than a server-side fault.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::InvalidToken { .. }
                | Self::TokenExpired
                | Self::InvalidSignature
                | Self::WrongKind { .. }
        )
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => Self::TokenExpired,
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            _ => Self::invalid_token(err.to_string()),
        }
    }
}

/// Result type alias for auth operations.
pub type AuthResult<T> = Result<T, AuthError>;
