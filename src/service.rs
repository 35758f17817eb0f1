//! Cache-backed access to the community resource API
//!
//! Composes the session cache with the retrying API client: reads check the
//! cache first and only go to the network on a miss, and only successful
//! fetches are written back. A failed fetch leaves the cache untouched, so
//! errors are never served from cache on a later call.

use std::future::Future;

use chrono::Duration;
use tracing::debug;

use crate::api::{ApiClient, ApiError, AuthTokens};
use crate::cache::MemoryCache;
use crate::config::ClientConfig;
use crate::data::{Experience, MigrationUpdate, NewStory, ServiceLocation, Story};

/// Cache keys, one per resource kind
const KEY_STORIES: &str = "stories";
const KEY_SERVICES: &str = "services";
const KEY_EXPERIENCES: &str = "experiences";
const KEY_MIGRATION: &str = "migration";

/// Returns the cached value for `key`, fetching and caching it on a miss
///
/// On a hit the fetcher is never invoked. On a miss the fetcher runs; its
/// success is stored under `key` with `ttl` and returned, while its failure
/// propagates without writing anything, so a subsequent call fetches again
/// instead of replaying a cached error.
///
/// Two callers racing on the same missing key both fetch and both write; the
/// last write wins. In-flight requests are not deduplicated.
pub async fn get_or_fetch<T, E, F, Fut>(
    cache: &MemoryCache<T>,
    key: &str,
    ttl: Duration,
    fetch: F,
) -> Result<T, E>
where
    T: Clone,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    if let Some(value) = cache.get(key) {
        return Ok(value);
    }
    debug!(key, "cache miss, fetching from network");
    let value = fetch().await?;
    cache.set(key, value.clone(), ttl);
    Ok(value)
}

/// A snapshot of every resource kind, fetched in one call
#[derive(Debug, Clone)]
pub struct Overview {
    pub stories: Vec<Story>,
    pub services: Vec<ServiceLocation>,
    pub experiences: Vec<Experience>,
    pub migration_updates: Vec<MigrationUpdate>,
}

/// High-level accessor over the API with one session cache per resource kind
///
/// The service owns its caches explicitly; there is no shared global state.
/// Dropping the service drops everything it cached.
#[derive(Debug)]
pub struct ResourceService {
    api: ApiClient,
    default_ttl: Duration,
    stories: MemoryCache<Vec<Story>>,
    services: MemoryCache<Vec<ServiceLocation>>,
    experiences: MemoryCache<Vec<Experience>>,
    migration: MemoryCache<Vec<MigrationUpdate>>,
}

impl ResourceService {
    /// Builds a service from configuration and the session's auth tokens
    pub fn new(config: &ClientConfig, tokens: AuthTokens) -> Result<Self, ApiError> {
        let api = ApiClient::with_timeout(&config.base_url, config.request_timeout)?
            .with_tokens(tokens)
            .with_retry(config.retry.clone());
        Ok(Self::with_api(api, config.default_ttl))
    }

    /// Builds a service around an existing client, mainly for tests
    pub fn with_api(api: ApiClient, default_ttl: Duration) -> Self {
        Self {
            api,
            default_ttl,
            stories: MemoryCache::new(),
            services: MemoryCache::new(),
            experiences: MemoryCache::new(),
            migration: MemoryCache::new(),
        }
    }

    /// Community stories, cached for the default TTL
    pub async fn stories(&self) -> Result<Vec<Story>, ApiError> {
        get_or_fetch(&self.stories, KEY_STORIES, self.default_ttl, || {
            self.api.get_json("api/stories")
        })
        .await
    }

    /// Service locations for the map, cached for the default TTL
    pub async fn service_locations(&self) -> Result<Vec<ServiceLocation>, ApiError> {
        get_or_fetch(&self.services, KEY_SERVICES, self.default_ttl, || {
            self.api.get_json("api/services")
        })
        .await
    }

    /// Shared experiences, cached for the default TTL
    pub async fn experiences(&self) -> Result<Vec<Experience>, ApiError> {
        get_or_fetch(&self.experiences, KEY_EXPERIENCES, self.default_ttl, || {
            self.api.get_json("api/experiences")
        })
        .await
    }

    /// Migration updates, cached for the default TTL
    pub async fn migration_updates(&self) -> Result<Vec<MigrationUpdate>, ApiError> {
        get_or_fetch(&self.migration, KEY_MIGRATION, self.default_ttl, || {
            self.api.get_json("api/migration")
        })
        .await
    }

    /// Fetches all four resource kinds concurrently
    pub async fn overview(&self) -> Result<Overview, ApiError> {
        let (stories, services, experiences, migration_updates) = futures::try_join!(
            self.stories(),
            self.service_locations(),
            self.experiences(),
            self.migration_updates(),
        )?;
        Ok(Overview {
            stories,
            services,
            experiences,
            migration_updates,
        })
    }

    /// Submits a new story and invalidates the cached story list
    pub async fn submit_story(&self, story: &NewStory) -> Result<Story, ApiError> {
        let created: Story = self.api.post_json("api/stories", story).await?;
        // The cached list no longer reflects the server; drop it so the next
        // read refetches
        self.stories.clear();
        Ok(created)
    }

    /// Empties every resource cache
    pub fn clear_caches(&self) {
        self.stories.clear();
        self.services.clear();
        self.experiences.clear();
        self.migration.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RetryPolicy;
    use chrono::Utc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration as StdDuration;

    fn ttl() -> Duration {
        Duration::minutes(30)
    }

    #[tokio::test]
    async fn test_get_or_fetch_hit_skips_fetcher() {
        let cache = MemoryCache::new();
        cache.set("key", 7_u32, ttl());
        let calls = AtomicU32::new(0);

        let result: Result<u32, String> = get_or_fetch(&cache, "key", ttl(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(99) }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 0, "hit must not fetch");
    }

    #[tokio::test]
    async fn test_get_or_fetch_miss_fetches_and_caches() {
        let cache = MemoryCache::new();
        let calls = AtomicU32::new(0);

        for _ in 0..3 {
            let result: Result<u32, String> = get_or_fetch(&cache, "key", ttl(), || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(42) }
            })
            .await;
            assert_eq!(result.unwrap(), 42);
        }

        // Only the first call went to the network; the rest hit the cache
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.get("key"), Some(42));
    }

    #[tokio::test]
    async fn test_get_or_fetch_failure_is_not_cached() {
        let cache: MemoryCache<u32> = MemoryCache::new();
        let calls = AtomicU32::new(0);

        let first: Result<u32, String> = get_or_fetch(&cache, "key", ttl(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err("network down".to_string()) }
        })
        .await;
        assert_eq!(first.unwrap_err(), "network down");
        assert!(cache.is_empty(), "a failure must not populate the cache");

        // The next call fetches again rather than replaying the failure
        let second: Result<u32, String> = get_or_fetch(&cache, "key", ttl(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(5) }
        })
        .await;
        assert_eq!(second.unwrap(), 5);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_get_or_fetch_zero_ttl_result_is_not_served_again() {
        let cache = MemoryCache::new();
        let calls = AtomicU32::new(0);

        for _ in 0..2 {
            let result: Result<u32, String> = get_or_fetch(&cache, "key", Duration::zero(), || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(1) }
            })
            .await;
            assert_eq!(result.unwrap(), 1);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    /// Service wired to a port nothing listens on, with a minimal retry budget
    fn offline_service() -> ResourceService {
        let api = ApiClient::with_timeout("http://127.0.0.1:1", StdDuration::from_millis(250))
            .expect("client should build")
            .with_retry(RetryPolicy::new(1, StdDuration::from_millis(1)));
        ResourceService::with_api(api, ttl())
    }

    fn sample_story() -> Story {
        Story {
            id: "story-1".to_string(),
            author: None,
            title: "Arrival".to_string(),
            body: "We landed in January.".to_string(),
            submitted_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_seeded_cache_serves_without_network() {
        let service = offline_service();
        service.stories.set(KEY_STORIES, vec![sample_story()], ttl());

        let stories = service.stories().await.expect("should come from cache");
        assert_eq!(stories.len(), 1);
        assert_eq!(stories[0].id, "story-1");
    }

    #[tokio::test]
    async fn test_network_failure_propagates_and_leaves_cache_empty() {
        let service = offline_service();

        let result = service.stories().await;
        assert!(matches!(result, Err(ApiError::RequestFailed(_))));
        assert!(service.stories.is_empty());
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_cached_story_list() {
        let service = offline_service();
        service.stories.set(KEY_STORIES, vec![sample_story()], ttl());

        let new_story = NewStory {
            title: "Arrival".to_string(),
            body: "We landed in January.".to_string(),
            author: None,
        };
        assert!(service.submit_story(&new_story).await.is_err());

        // Invalidation happens only after a successful write
        assert_eq!(service.stories.len(), 1);
    }

    #[tokio::test]
    async fn test_clear_caches_forgets_seeded_data() {
        let service = offline_service();
        service.stories.set(KEY_STORIES, vec![sample_story()], ttl());

        service.clear_caches();

        // With the cache cleared the service must hit the (dead) network
        assert!(service.stories().await.is_err());
    }
}
