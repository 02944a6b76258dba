//! Authentication configuration.

use serde::{Deserialize, Serialize};

use crate::token::DEFAULT_REFRESH_TTL_SECS;

/// Token configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Shared HS256 signing secret. Required; there is no safe default.
    #[serde(default)]
    pub secret: String,

    /// Access-token lifetime in seconds.
    #[serde(default = "default_access_ttl_secs")]
    pub access_ttl_secs: u64,

    /// Refresh-token lifetime in seconds.
    #[serde(default = "default_refresh_ttl_secs")]
    pub refresh_ttl_secs: u64,
}

fn default_access_ttl_secs() -> u64 {
    3600
}

fn default_refresh_ttl_secs() -> u64 {
    DEFAULT_REFRESH_TTL_SECS
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            access_ttl_secs: default_access_ttl_secs(),
            refresh_ttl_secs: default_refresh_ttl_secs(),
        }
    }
}

impl AuthConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns a message if the secret is unset or the lifetimes are zero.
    pub fn validate(&self) -> Result<(), String> {
        if self.secret.is_empty() {
            return Err("auth.secret must be set".into());
        }
        if self.access_ttl_secs == 0 {
            return Err("auth.access_ttl_secs must be > 0".into());
        }
        if self.refresh_ttl_secs == 0 {
            return Err("auth.refresh_ttl_secs must be > 0".into());
        }
        Ok(())
    }
}
