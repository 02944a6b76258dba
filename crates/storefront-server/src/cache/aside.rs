//! The cache-aside read flow for collection lists.
//!
//! Check the cache; on hit return the cached list (refreshing its TTL); on
//! miss query the store, populate the cache best-effort, and return the
//! fresh list. Writers invalidate the list key after persisting.
//!
//! Two requests racing between invalidation and repopulation can leave a
//! briefly-stale list in the cache; the TTL bounds the staleness and no
//! guard is attempted.

use std::fmt;
use std::future::Future;

use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::cache::client::CacheClient;

/// Cache key for the user collection.
pub const USERS_LIST_KEY: &str = "users:list";

/// Cache key for the product collection.
pub const PRODUCTS_LIST_KEY: &str = "products:list";

/// Cache key for a single pre-warmed product.
#[must_use]
pub fn product_key(id: Uuid) -> String {
    format!("product:{id}")
}

/// Where a list read was served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Cache,
    Database,
}

impl Source {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cache => "cache",
            Self::Database => "database",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reads a collection through the cache.
///
/// On a hit the key's TTL is reset to `ttl_secs`. On a miss `load` queries
/// the store and the result is cached with the same TTL. Cache failures on
/// either side are already swallowed by [`CacheClient`]; only the loader's
/// error propagates.
///
/// # Errors
///
/// Returns the loader's error when the store query fails.
pub async fn list_read_through<T, E, F, Fut>(
    cache: &CacheClient,
    key: &str,
    ttl_secs: u64,
    load: F,
) -> Result<(Vec<T>, Source), E>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<T>, E>>,
{
    if let Some(items) = cache.get_json_with_refresh::<Vec<T>>(key, ttl_secs).await {
        tracing::debug!(key = %key, "list served from cache");
        return Ok((items, Source::Cache));
    }

    let items = load().await?;
    cache.set_json(key, &items, Some(ttl_secs)).await;
    tracing::debug!(key = %key, count = items.len(), "list served from database");
    Ok((items, Source::Database))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_through_falls_to_loader_without_cache() {
        let cache = CacheClient::disabled();

        let (items, source) = list_read_through(&cache, USERS_LIST_KEY, 10, || async {
            Ok::<_, std::convert::Infallible>(vec!["a".to_string(), "b".to_string()])
        })
        .await
        .unwrap();

        assert_eq!(items, vec!["a", "b"]);
        assert_eq!(source, Source::Database);
    }

    #[tokio::test]
    async fn test_read_through_propagates_loader_error() {
        let cache = CacheClient::disabled();

        let result = list_read_through::<String, _, _, _>(&cache, PRODUCTS_LIST_KEY, 10, || async {
            Err("store down")
        })
        .await;

        assert_eq!(result.unwrap_err(), "store down");
    }

    #[test]
    fn test_source_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Source::Cache).unwrap(), "\"cache\"");
        assert_eq!(Source::Database.to_string(), "database");
    }

    #[test]
    fn test_product_key_format() {
        let id = Uuid::nil();
        assert_eq!(
            product_key(id),
            "product:00000000-0000-0000-0000-000000000000"
        );
    }
}
