//! HTTP server for the storefront API.
//!
//! Wires the storage backend, the Redis cache, and the token service into an
//! axum application: CRUD routes for users, products, and categories behind
//! a uniform JSON envelope, with JWT authentication and fixed-window rate
//! limiting.

pub mod bootstrap;
pub mod cache;
pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod rate_limit;
pub mod response;
pub mod server;
pub mod state;
pub mod validation;

pub use cache::client::CacheClient;
pub use config::{
    AppConfig, BootstrapConfig, CacheSettings, LoggingConfig, RateLimitConfig, RedisConfig,
    ServerConfig,
};
pub use observability::{init_tracing, shutdown_tracing};
pub use response::ApiResponse;
pub use server::{ServerBuilder, StorefrontServer, build_app};
pub use state::AppState;

/// Create a cache client based on configuration.
///
/// ## Graceful Degradation
///
/// If Redis is disabled or the connection fails after the configured
/// retries, a disabled client is returned: every read is a miss and every
/// write a no-op, so the server runs against the database alone.
pub async fn create_cache_client(config: &RedisConfig) -> CacheClient {
    CacheClient::connect(config).await
}
