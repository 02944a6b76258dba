//! Integration tests for the Redis cache client and the cache-aside flow.
//!
//! Tests use testcontainers to spin up a real Redis instance.

use std::time::Duration;

use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::redis::Redis;
use tokio::sync::OnceCell;
use uuid::Uuid;

use storefront_server::cache::{Source, list_read_through};
use storefront_server::{CacheClient, RedisConfig};

// Shared Redis container for all tests
static SHARED_REDIS: OnceCell<(ContainerAsync<Redis>, String)> = OnceCell::const_new();

/// Get or create the shared Redis container
async fn get_redis_url() -> String {
    let (_, url) = SHARED_REDIS
        .get_or_init(|| async {
            let container = Redis::default()
                .start()
                .await
                .expect("start redis container");

            let host_port = container.get_host_port_ipv4(6379).await.expect("get port");
            let url = format!("redis://127.0.0.1:{}", host_port);

            (container, url)
        })
        .await;

    url.clone()
}

async fn client() -> CacheClient {
    let config = RedisConfig {
        enabled: true,
        url: get_redis_url().await,
        ..Default::default()
    };
    let cache = CacheClient::connect(&config).await;
    assert!(cache.is_enabled(), "expected a live Redis connection");
    cache
}

fn unique_key(prefix: &str) -> String {
    format!("{prefix}:{}", Uuid::new_v4())
}

#[tokio::test]
async fn test_set_get_delete_roundtrip() {
    let cache = client().await;
    let key = unique_key("roundtrip");

    assert!(cache.set(&key, "hello", Some(60)).await);
    assert_eq!(cache.get(&key).await.as_deref(), Some("hello"));

    assert!(cache.delete(&key).await);
    assert_eq!(cache.get(&key).await, None);
}

#[tokio::test]
async fn test_entry_expires_after_ttl() {
    let cache = client().await;
    let key = unique_key("expiry");

    assert!(cache.set(&key, "short-lived", Some(1)).await);
    assert!(cache.get(&key).await.is_some());

    tokio::time::sleep(Duration::from_millis(1300)).await;
    assert_eq!(cache.get(&key).await, None);
}

#[tokio::test]
async fn test_get_with_refresh_extends_ttl() {
    let cache = client().await;
    let key = unique_key("refresh");

    assert!(cache.set(&key, "sticky", Some(1)).await);
    tokio::time::sleep(Duration::from_millis(700)).await;

    // The hit resets the expiry to 2 seconds.
    assert_eq!(
        cache.get_with_refresh(&key, Some(2)).await.as_deref(),
        Some("sticky")
    );

    // Past the original 1s expiry, the key must still be there.
    tokio::time::sleep(Duration::from_millis(800)).await;
    assert!(cache.get(&key).await.is_some());
}

#[tokio::test]
async fn test_get_with_refresh_miss_has_no_side_effects() {
    let cache = client().await;
    let key = unique_key("refresh-miss");

    assert_eq!(cache.get_with_refresh(&key, Some(10)).await, None);
    assert_eq!(cache.get(&key).await, None);
}

#[tokio::test]
async fn test_undecodable_value_is_treated_as_miss_and_dropped() {
    let cache = client().await;
    let key = unique_key("garbage");

    assert!(cache.set(&key, "not json at all", None).await);
    assert_eq!(cache.get_json::<Vec<String>>(&key).await, None);
    // The bad entry was evicted so the next read repopulates.
    assert_eq!(cache.get(&key).await, None);
}

#[tokio::test]
async fn test_json_roundtrip() {
    let cache = client().await;
    let key = unique_key("json");

    let items = vec!["a".to_string(), "b".to_string()];
    assert!(cache.set_json(&key, &items, Some(60)).await);
    assert_eq!(cache.get_json::<Vec<String>>(&key).await, Some(items));
}

#[tokio::test]
async fn test_read_through_source_flips_on_invalidation() {
    let cache = client().await;
    let key = unique_key("aside");

    let load = || async { Ok::<_, std::convert::Infallible>(vec![1u32, 2, 3]) };

    // Cold: the loader runs and the cache is populated.
    let (items, source) = list_read_through(&cache, &key, 30, load).await.unwrap();
    assert_eq!(items, vec![1, 2, 3]);
    assert_eq!(source, Source::Database);

    // Warm within the TTL window: served from the cache.
    let (items, source) = list_read_through(&cache, &key, 30, load).await.unwrap();
    assert_eq!(items, vec![1, 2, 3]);
    assert_eq!(source, Source::Cache);

    // After a write-side invalidation the next read goes back to the store.
    assert!(cache.delete(&key).await);
    let (_, source) = list_read_through(&cache, &key, 30, load).await.unwrap();
    assert_eq!(source, Source::Database);
}
