//! Best-effort Redis client.
//!
//! Wraps a deadpool-redis pool behind an `Option`: a disabled client (Redis
//! off, or unreachable at startup) answers every get with a miss and every
//! write with `false`. Connectivity and command failures are logged at warn
//! and reported the same way; they never propagate to the caller, so the
//! fallback path to the data store always runs.

use std::future::Future;
use std::time::Duration;

use deadpool_redis::Pool;
use redis::AsyncCommands;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::cache::retry::retry_delay;
use crate::config::RedisConfig;

/// Shared, cloneable cache handle.
#[derive(Clone)]
pub struct CacheClient {
    pool: Option<Pool>,
    command_timeout: Duration,
}

impl CacheClient {
    /// A client with no backing store; all operations are misses/no-ops.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            pool: None,
            command_timeout: Duration::from_secs(2),
        }
    }

    /// Connects according to configuration.
    ///
    /// Retries the initial connection on the linear backoff schedule from
    /// [`retry_delay`](crate::cache::retry::retry_delay); once the attempts
    /// are exhausted the client degrades to disabled rather than failing
    /// startup.
    pub async fn connect(config: &RedisConfig) -> Self {
        if !config.enabled {
            tracing::info!("Redis disabled, cache is off");
            return Self::disabled();
        }

        tracing::info!(url = %config.url, "Connecting to Redis");

        let mut redis_config = deadpool_redis::Config::from_url(config.connection_url());
        let pool_config = redis_config
            .pool
            .get_or_insert_with(deadpool_redis::PoolConfig::default);
        pool_config.max_size = config.pool_size;
        pool_config.timeouts.wait = Some(Duration::from_millis(config.connect_timeout_ms));
        pool_config.timeouts.create = Some(Duration::from_millis(config.connect_timeout_ms));

        let pool = match redis_config.create_pool(Some(deadpool_redis::Runtime::Tokio1)) {
            Ok(pool) => pool,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to create Redis pool, cache is off");
                return Self::disabled();
            }
        };

        let mut attempt = 1u32;
        loop {
            match pool.get().await {
                Ok(_) => {
                    tracing::info!("Connected to Redis");
                    return Self {
                        pool: Some(pool),
                        command_timeout: Duration::from_millis(config.command_timeout_ms),
                    };
                }
                Err(e) => {
                    match retry_delay(attempt, config.retry_max, config.retry_base_interval_ms) {
                        Some(delay) => {
                            tracing::warn!(
                                error = %e,
                                attempt,
                                delay_ms = delay.as_millis() as u64,
                                "Redis connection failed, retrying"
                            );
                            tokio::time::sleep(delay).await;
                            attempt += 1;
                        }
                        None => {
                            tracing::warn!(
                                error = %e,
                                "Redis connection retries exhausted, cache is off"
                            );
                            return Self::disabled();
                        }
                    }
                }
            }
        }
    }

    /// Returns `true` if a pool is configured.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.pool.is_some()
    }

    /// Returns `true` if a connection can currently be checked out
    /// (for readiness probes).
    pub async fn is_available(&self) -> bool {
        match &self.pool {
            Some(pool) => pool.get().await.is_ok(),
            None => false,
        }
    }

    /// Closes the pool. Safe to call on a disabled client.
    pub fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close();
        }
    }

    async fn conn(&self) -> Option<deadpool_redis::Connection> {
        let pool = self.pool.as_ref()?;
        match pool.get().await {
            Ok(conn) => Some(conn),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to get Redis connection");
                None
            }
        }
    }

    /// Runs one command with the configured timeout, degrading errors to
    /// `None`.
    async fn run<T>(
        &self,
        op: &'static str,
        key: &str,
        fut: impl Future<Output = redis::RedisResult<T>>,
    ) -> Option<T> {
        match tokio::time::timeout(self.command_timeout, fut).await {
            Ok(Ok(value)) => Some(value),
            Ok(Err(e)) => {
                tracing::warn!(key = %key, op = %op, error = %e, "Redis command error");
                None
            }
            Err(_) => {
                tracing::warn!(key = %key, op = %op, "Redis command timed out");
                None
            }
        }
    }

    /// Gets the raw string value for `key`.
    pub async fn get(&self, key: &str) -> Option<String> {
        let mut conn = self.conn().await?;
        self.run("GET", key, conn.get::<_, Option<String>>(key))
            .await
            .flatten()
    }

    /// Gets the raw value and, on a hit, resets the key's expiry to
    /// `refresh_ttl_secs`. A miss has no side effects.
    pub async fn get_with_refresh(&self, key: &str, refresh_ttl_secs: Option<u64>) -> Option<String> {
        let mut conn = self.conn().await?;
        let value = self
            .run("GET", key, conn.get::<_, Option<String>>(key))
            .await
            .flatten()?;

        if let Some(ttl) = refresh_ttl_secs {
            self.run("EXPIRE", key, conn.expire::<_, i64>(key, ttl as i64))
                .await;
        }

        Some(value)
    }

    /// Sets `key` to the raw string `value`, with an optional TTL in
    /// seconds. Returns `false` on any failure.
    pub async fn set(&self, key: &str, value: &str, ttl_secs: Option<u64>) -> bool {
        let Some(mut conn) = self.conn().await else {
            return false;
        };
        match ttl_secs {
            Some(ttl) => self
                .run("SETEX", key, conn.set_ex::<_, _, ()>(key, value, ttl))
                .await
                .is_some(),
            None => self
                .run("SET", key, conn.set::<_, _, ()>(key, value))
                .await
                .is_some(),
        }
    }

    /// Sets the key's expiry. Returns `false` on any failure.
    pub async fn expire(&self, key: &str, ttl_secs: u64) -> bool {
        let Some(mut conn) = self.conn().await else {
            return false;
        };
        self.run("EXPIRE", key, conn.expire::<_, i64>(key, ttl_secs as i64))
            .await
            .is_some()
    }

    /// Deletes `key`. Returns `false` on any failure.
    pub async fn delete(&self, key: &str) -> bool {
        let Some(mut conn) = self.conn().await else {
            return false;
        };
        self.run("DEL", key, conn.del::<_, i64>(key)).await.is_some()
    }

    /// Gets and deserializes a JSON value. A value that fails to
    /// deserialize is dropped and treated as a miss.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get(key).await?;
        self.decode(key, &raw).await
    }

    /// [`get_json`](Self::get_json) with TTL refresh on hit.
    pub async fn get_json_with_refresh<T: DeserializeOwned>(
        &self,
        key: &str,
        refresh_ttl_secs: u64,
    ) -> Option<T> {
        let raw = self.get_with_refresh(key, Some(refresh_ttl_secs)).await?;
        self.decode(key, &raw).await
    }

    /// Serializes and sets a JSON value. Returns `false` on any failure.
    pub async fn set_json<T: Serialize>(&self, key: &str, value: &T, ttl_secs: Option<u64>) -> bool {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to serialize value for cache");
                return false;
            }
        };
        self.set(key, &raw, ttl_secs).await
    }

    async fn decode<T: DeserializeOwned>(&self, key: &str, raw: &str) -> Option<T> {
        match serde_json::from_str(raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to deserialize cached value");
                self.delete(key).await;
                None
            }
        }
    }
}
