use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use crate::core::{CancelSignal, RankingPipeline, RecommendError};
use crate::models::{PostingQuery, RankingOptions, RecommendationResult};
use crate::services::cache::{CacheKey, RecommendationCache};
use crate::services::source::{PostingSource, ProfileSource, SourceError};

/// Errors surfaced to the API layer
#[derive(Debug, Error)]
pub enum RecommendationError {
    #[error(transparent)]
    Ranking(#[from] RecommendError),

    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("Source error: {0}")]
    Source(String),

    #[error("Scoring task failed: {0}")]
    Worker(String),
}

impl From<SourceError> for RecommendationError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::NotFound(msg) => RecommendationError::ProfileNotFound(msg),
            SourceError::Unavailable(msg) => RecommendationError::Source(msg),
        }
    }
}

/// Ranked result plus the size of the candidate set it came from
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub result: RecommendationResult,
    pub total_candidates: usize,
}

/// Supplies profile and candidates to the ranking pipeline
///
/// Scoring runs on a blocking task so the rayon pool never stalls the
/// async runtime. The optional deadline covers fetching and scoring.
pub struct RecommendationService {
    postings: Arc<dyn PostingSource>,
    profiles: Arc<dyn ProfileSource>,
    pipeline: RankingPipeline,
    cache: Option<RecommendationCache>,
    candidate_fetch_limit: Option<usize>,
}

impl RecommendationService {
    pub fn new(
        postings: Arc<dyn PostingSource>,
        profiles: Arc<dyn ProfileSource>,
        pipeline: RankingPipeline,
    ) -> Self {
        Self {
            postings,
            profiles,
            pipeline,
            cache: None,
            candidate_fetch_limit: None,
        }
    }

    pub fn with_cache(mut self, cache: RecommendationCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_candidate_fetch_limit(mut self, limit: Option<usize>) -> Self {
        self.candidate_fetch_limit = limit;
        self
    }

    pub async fn recommend(
        &self,
        subject_id: &str,
        options: RankingOptions,
        deadline: Option<Duration>,
    ) -> Result<Arc<Recommendation>, RecommendationError> {
        let cancel = deadline.map(CancelSignal::with_timeout);
        let key = CacheKey::recommendations(subject_id, &options);

        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(&key).await {
                tracing::debug!("Serving cached recommendations for {}", subject_id);
                return Ok(hit);
            }
        }

        let profile = self.profiles.fetch_profile(subject_id).await?;

        let query = PostingQuery {
            subject_id: subject_id.to_string(),
            limit: self.candidate_fetch_limit,
        };
        let candidates = self.postings.fetch_postings(&query).await?;
        let total_candidates = candidates.len();

        tracing::debug!("Fetched {} candidate postings for {}", total_candidates, subject_id);

        let pipeline = self.pipeline.clone();
        let result = tokio::task::spawn_blocking(move || {
            pipeline.recommend(&profile, &candidates, &options, cancel.as_ref())
        })
        .await
        .map_err(|e| RecommendationError::Worker(e.to_string()))??;

        if result.partial {
            tracing::warn!(
                "Deadline reached for {}, returning {} partial recommendations",
                subject_id,
                result.results.len()
            );
        }

        let recommendation = Arc::new(Recommendation {
            result,
            total_candidates,
        });

        if let Some(cache) = &self.cache {
            cache.insert(key, recommendation.clone()).await;
        }

        Ok(recommendation)
    }
}
