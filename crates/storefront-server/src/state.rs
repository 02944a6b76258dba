//! Shared application state.
//!
//! Built once at startup and handed to every request handler through axum's
//! `State` extractor; nothing is looked up ambiently.

use std::sync::Arc;

use storefront_auth::TokenService;
use storefront_storage::Storage;

use crate::cache::CacheClient;
use crate::config::CacheSettings;

/// Process-wide handles shared by all request tasks.
#[derive(Clone)]
pub struct AppState {
    /// The source of truth.
    pub storage: Arc<dyn Storage>,
    /// Best-effort read cache over the storage.
    pub cache: CacheClient,
    /// Token issuer/verifier.
    pub tokens: Arc<TokenService>,
    /// TTLs for the read-through caches.
    pub cache_settings: CacheSettings,
}

impl AppState {
    /// Assembles the state from its parts.
    #[must_use]
    pub fn new(
        storage: Arc<dyn Storage>,
        cache: CacheClient,
        tokens: Arc<TokenService>,
        cache_settings: CacheSettings,
    ) -> Self {
        Self {
            storage,
            cache,
            tokens,
            cache_settings,
        }
    }
}
