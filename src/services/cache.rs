use std::sync::Arc;
use std::time::Duration;
use crate::models::RankingOptions;
use crate::services::recommendation::Recommendation;

/// Time-boxed in-memory cache of complete recommendation results
///
/// Profiles and postings change over time, so entries live only for a
/// short TTL. Partial results are never stored.
#[derive(Clone)]
pub struct RecommendationCache {
    inner: moka::future::Cache<String, Arc<Recommendation>>,
}

impl RecommendationCache {
    pub fn new(capacity: u64, ttl_secs: u64) -> Self {
        let inner = moka::future::CacheBuilder::new(capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { inner }
    }

    pub async fn get(&self, key: &str) -> Option<Arc<Recommendation>> {
        let hit = self.inner.get(key).await;
        if hit.is_some() {
            tracing::trace!("Recommendation cache hit: {}", key);
        } else {
            tracing::trace!("Recommendation cache miss: {}", key);
        }
        hit
    }

    /// Store a result; returns false when it was not cacheable
    pub async fn insert(&self, key: String, value: Arc<Recommendation>) -> bool {
        if value.result.partial {
            return false;
        }
        self.inner.insert(key, value).await;
        true
    }

    pub async fn invalidate(&self, key: &str) {
        self.inner.invalidate(key).await;
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for a recommendation request
    pub fn recommendations(subject_id: &str, options: &RankingOptions) -> String {
        format!(
            "recs:{}:{}:{}:{}",
            subject_id, options.limit, options.min_score_threshold, options.require_preferences
        )
    }
}
