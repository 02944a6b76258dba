use std::net::SocketAddr;

use serde::{Deserialize, Serialize};
use storefront_auth::AuthConfig;
use storefront_db_postgres::PostgresConfig;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    /// Redis configuration
    #[serde(default)]
    pub redis: RedisConfig,
    /// Cache TTLs
    #[serde(default)]
    pub cache: CacheSettings,
    /// Token configuration
    #[serde(default)]
    pub auth: AuthConfig,
    /// Fixed-window rate limiting
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Startup seeding (admin user, default categories)
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("server.port must be > 0".into());
        }
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        self.storage
            .postgres
            .validate()
            .map_err(|e| format!("storage config error: {e}"))?;
        self.auth
            .validate()
            .map_err(|e| format!("auth config error: {e}"))?;
        if self.rate_limit.window_ms == 0 {
            return Err("rate_limit.window_ms must be > 0".into());
        }
        if self.rate_limit.max_requests == 0 {
            return Err("rate_limit.max_requests must be > 0".into());
        }
        if self.cache.list_ttl_secs == 0 || self.cache.product_ttl_secs == 0 {
            return Err("cache TTLs must be > 0".into());
        }
        Ok(())
    }

    pub fn addr(&self) -> SocketAddr {
        use std::net::{IpAddr, Ipv4Addr};
        let host: IpAddr = self
            .server
            .host
            .parse()
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));
        SocketAddr::from((host, self.server.port))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// PostgreSQL storage options
    #[serde(default)]
    pub postgres: PostgresConfig,
}

/// Redis configuration.
///
/// The cache is strictly an optimization; with `enabled = false` (or Redis
/// unreachable) every request falls through to the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Enable Redis (gracefully degrades without it)
    #[serde(default = "default_redis_enabled")]
    pub enabled: bool,

    /// Redis connection URL (e.g., "redis://localhost:6379")
    #[serde(default = "default_redis_url")]
    pub url: String,

    /// Password, if not embedded in the URL
    #[serde(default)]
    pub password: Option<String>,

    /// Database index, if not embedded in the URL
    #[serde(default)]
    pub db: Option<i64>,

    /// Connection pool size
    #[serde(default = "default_redis_pool_size")]
    pub pool_size: usize,

    /// Connection timeout in milliseconds
    #[serde(default = "default_redis_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Per-command timeout in milliseconds
    #[serde(default = "default_redis_command_timeout_ms")]
    pub command_timeout_ms: u64,

    /// Maximum connection attempts at startup
    #[serde(default = "default_redis_retry_max")]
    pub retry_max: u32,

    /// Base delay between connection attempts in milliseconds; the delay
    /// grows linearly with the attempt number, capped at two seconds
    #[serde(default = "default_redis_retry_base_interval_ms")]
    pub retry_base_interval_ms: u64,
}

fn default_redis_enabled() -> bool {
    false
}
fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}
fn default_redis_pool_size() -> usize {
    10
}
fn default_redis_connect_timeout_ms() -> u64 {
    5000
}
fn default_redis_command_timeout_ms() -> u64 {
    2000
}
fn default_redis_retry_max() -> u32 {
    10
}
fn default_redis_retry_base_interval_ms() -> u64 {
    100
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            enabled: default_redis_enabled(),
            url: default_redis_url(),
            password: None,
            db: None,
            pool_size: default_redis_pool_size(),
            connect_timeout_ms: default_redis_connect_timeout_ms(),
            command_timeout_ms: default_redis_command_timeout_ms(),
            retry_max: default_redis_retry_max(),
            retry_base_interval_ms: default_redis_retry_base_interval_ms(),
        }
    }
}

impl RedisConfig {
    /// The effective connection URL with password and database index
    /// spliced in when they were given as separate options.
    #[must_use]
    pub fn connection_url(&self) -> String {
        let mut url = self.url.clone();
        if let Some(password) = &self.password
            && !url.contains('@')
            && let Some(rest) = url.strip_prefix("redis://")
        {
            url = format!("redis://:{password}@{rest}");
        }
        if let Some(db) = self.db
            && url.matches('/').count() <= 2
        {
            url = format!("{}/{db}", url.trim_end_matches('/'));
        }
        url
    }
}

/// Cache TTLs for the read-through list caches.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CacheSettings {
    /// TTL for collection list keys (`users:list`, `products:list`)
    #[serde(default = "default_list_ttl_secs")]
    pub list_ttl_secs: u64,

    /// TTL for the pre-warmed single-product key (`product:<id>`)
    #[serde(default = "default_product_ttl_secs")]
    pub product_ttl_secs: u64,
}

fn default_list_ttl_secs() -> u64 {
    10
}
fn default_product_ttl_secs() -> u64 {
    60
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            list_ttl_secs: default_list_ttl_secs(),
            product_ttl_secs: default_product_ttl_secs(),
        }
    }
}

/// Fixed-window rate limiting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Window length in milliseconds
    #[serde(default = "default_rate_limit_window_ms")]
    pub window_ms: u64,

    /// Requests allowed per client key per window
    #[serde(default = "default_rate_limit_max_requests")]
    pub max_requests: u32,
}

fn default_rate_limit_window_ms() -> u64 {
    15 * 60 * 1000
}
fn default_rate_limit_max_requests() -> u32 {
    100
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_ms: default_rate_limit_window_ms(),
            max_requests: default_rate_limit_max_requests(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Startup seeding for a fresh database.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BootstrapConfig {
    /// Admin user created on first startup (if not already present).
    /// Credentials can also come from environment variables:
    /// `STOREFRONT__BOOTSTRAP__ADMIN_USER__EMAIL` /
    /// `STOREFRONT__BOOTSTRAP__ADMIN_USER__PASSWORD`
    #[serde(default)]
    pub admin_user: Option<AdminUserConfig>,

    /// Categories created on first startup (if not already present)
    #[serde(default)]
    pub seed_categories: Vec<SeedCategory>,
}

/// Configuration for bootstrapping an admin user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUserConfig {
    /// Admin email (required)
    pub email: String,
    /// Admin password in plain text (will be hashed)
    pub password: String,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Age, because user records require one
    #[serde(default = "default_admin_age")]
    pub age: i32,
}

fn default_admin_age() -> i32 {
    18
}

/// A category seeded at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedCategory {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

pub mod loader {
    use super::AppConfig;
    use config::{Config, Environment, File};
    use std::path::PathBuf;

    pub fn load_config(path: Option<&str>) -> Result<AppConfig, String> {
        let mut builder = Config::builder();
        match path {
            Some(p) => {
                let pathbuf = PathBuf::from(p);
                if pathbuf.exists() {
                    builder = builder.add_source(File::from(pathbuf));
                }
            }
            None => {
                let default_path = PathBuf::from("storefront.toml");
                if default_path.exists() {
                    builder = builder.add_source(File::from(default_path));
                }
            }
        }
        // Environment variable overrides, e.g., STOREFRONT__SERVER__PORT=9090
        builder = builder.add_source(
            Environment::with_prefix("STOREFRONT")
                .try_parsing(true)
                .separator("__"),
        );
        let cfg = builder
            .build()
            .map_err(|e| format!("config build error: {e}"))?;
        let merged: AppConfig = cfg
            .try_deserialize()
            .map_err(|e| format!("config deserialize error: {e}"))?;
        merged.validate()?;
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_limits() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.rate_limit.window_ms, 900_000);
        assert_eq!(cfg.rate_limit.max_requests, 100);
        assert_eq!(cfg.cache.list_ttl_secs, 10);
        assert_eq!(cfg.cache.product_ttl_secs, 60);
        assert!(!cfg.redis.enabled);
    }

    #[test]
    fn test_validate_requires_auth_secret() {
        let cfg = AppConfig::default();
        assert!(cfg.validate().unwrap_err().contains("auth"));

        let mut cfg = AppConfig::default();
        cfg.auth.secret = "s3cret".into();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_redis_url_splicing() {
        let cfg = RedisConfig {
            password: Some("pw".into()),
            db: Some(2),
            ..Default::default()
        };
        assert_eq!(cfg.connection_url(), "redis://:pw@localhost:6379/2");

        let cfg = RedisConfig::default();
        assert_eq!(cfg.connection_url(), "redis://localhost:6379");
    }
}
