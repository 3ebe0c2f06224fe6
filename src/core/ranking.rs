use std::cmp::Ordering;
use rayon::prelude::*;
use thiserror::Error;
use crate::models::{
    JobPosting, MatchScore, PointBudgets, PreferenceProfile, RankingOptions, RecommendationResult,
};
use crate::core::{cancel::CancelSignal, scoring::score_posting};

/// Pipeline-level failures; per-posting problems never surface here
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecommendError {
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),
}

/// Per-worker buffer, merged once all workers finish
#[derive(Debug, Default)]
struct ScoredBatch {
    scores: Vec<MatchScore>,
    skipped: usize,
    undispatched: usize,
}

impl ScoredBatch {
    fn merge(mut self, mut other: ScoredBatch) -> ScoredBatch {
        self.scores.append(&mut other.scores);
        self.skipped += other.skipped;
        self.undispatched += other.undispatched;
        self
    }
}

/// Ranking orchestrator - scores a candidate set and builds the recommendation list
///
/// # Pipeline Stages
/// 1. Dispatch postings across a worker pool of `min(max_workers, candidates)` threads
/// 2. Collect scores, counting structural skips
/// 3. Filter scores at or below the threshold
/// 4. Sort by score, then recency, then posting id
/// 5. Truncate to the requested limit
#[derive(Debug, Clone)]
pub struct RankingPipeline {
    budgets: PointBudgets,
    max_workers: usize,
}

impl RankingPipeline {
    pub fn new(budgets: PointBudgets, max_workers: usize) -> Self {
        Self {
            budgets,
            max_workers: max_workers.max(1),
        }
    }

    pub fn with_default_budgets() -> Self {
        Self::new(PointBudgets::default(), default_max_workers())
    }

    pub fn budgets(&self) -> &PointBudgets {
        &self.budgets
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Produce ranked recommendations for a profile
    ///
    /// # Arguments
    /// * `profile` - The job seeker's preferences
    /// * `candidates` - Open postings supplied by the posting source
    /// * `options` - Threshold, limit and profile strictness
    /// * `cancel` - Optional signal; once tripped no further postings are scored
    ///
    /// # Returns
    /// RecommendationResult with ordered scores, the skip count, and whether
    /// cancellation left some postings unscored
    pub fn recommend(
        &self,
        profile: &PreferenceProfile,
        candidates: &[JobPosting],
        options: &RankingOptions,
        cancel: Option<&CancelSignal>,
    ) -> Result<RecommendationResult, RecommendError> {
        validate_profile(profile, options.require_preferences)?;

        if candidates.is_empty() {
            return Ok(RecommendationResult::default());
        }

        let batch = self.score_all(profile, candidates, cancel);

        tracing::debug!(
            "Scored {} of {} postings for {} ({} skipped, {} not dispatched)",
            batch.scores.len(),
            candidates.len(),
            profile.subject_id,
            batch.skipped,
            batch.undispatched
        );

        Ok(finish(batch, options))
    }

    fn score_all(
        &self,
        profile: &PreferenceProfile,
        candidates: &[JobPosting],
        cancel: Option<&CancelSignal>,
    ) -> ScoredBatch {
        let score_one =
            |batch: ScoredBatch, posting: &JobPosting| self.score_into(batch, posting, profile, cancel);

        let workers = self.max_workers.min(candidates.len());
        if workers <= 1 {
            return candidates.iter().fold(ScoredBatch::default(), &score_one);
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("ranking-worker-{}", i))
            .build();

        match pool {
            Ok(pool) => pool.install(|| {
                candidates
                    .par_iter()
                    .fold(ScoredBatch::default, &score_one)
                    .reduce(ScoredBatch::default, ScoredBatch::merge)
            }),
            Err(e) => {
                tracing::warn!("Failed to build ranking worker pool ({}), scoring inline", e);
                candidates.iter().fold(ScoredBatch::default(), &score_one)
            }
        }
    }
}

impl RankingPipeline {
    /// Score one posting into a worker buffer unless the signal has tripped
    fn score_into(
        &self,
        mut batch: ScoredBatch,
        posting: &JobPosting,
        profile: &PreferenceProfile,
        cancel: Option<&CancelSignal>,
    ) -> ScoredBatch {
        if cancel.is_some_and(|c| c.is_cancelled()) {
            batch.undispatched += 1;
            return batch;
        }

        match score_posting(posting, profile, &self.budgets) {
            Ok(score) => batch.scores.push(score),
            Err(skip) => {
                tracing::debug!("Skipping posting: {}", skip);
                batch.skipped += 1;
            }
        }
        batch
    }
}

/// Turn merged worker buffers into the final result
fn finish(batch: ScoredBatch, options: &RankingOptions) -> RecommendationResult {
    RecommendationResult {
        results: rank(batch.scores, options),
        skipped_count: batch.skipped,
        partial: batch.undispatched > 0,
    }
}

impl Default for RankingPipeline {
    fn default() -> Self {
        Self::with_default_budgets()
    }
}

/// Worker count used when none is configured
pub fn default_max_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Reject profiles that cannot produce a meaningful score
pub fn validate_profile(
    profile: &PreferenceProfile,
    require_preferences: bool,
) -> Result<(), RecommendError> {
    if profile.subject_id.trim().is_empty() {
        return Err(RecommendError::InvalidProfile(
            "profile has no subject id".to_string(),
        ));
    }

    if require_preferences && !profile.has_preferences() {
        return Err(RecommendError::InvalidProfile(format!(
            "profile {} has no populated preferences",
            profile.subject_id
        )));
    }

    Ok(())
}

/// Filter, sort and truncate collected scores
pub fn rank(mut scores: Vec<MatchScore>, options: &RankingOptions) -> Vec<MatchScore> {
    scores.retain(|s| s.total > options.min_score_threshold);
    scores.sort_by(compare_ranked);
    scores.truncate(options.limit);
    scores
}

/// Score descending, then most recent posting, then smallest posting id
fn compare_ranked(a: &MatchScore, b: &MatchScore) -> Ordering {
    b.total
        .total_cmp(&a.total)
        .then_with(|| match (a.posted_at, b.posted_at) {
            (Some(a_at), Some(b_at)) => b_at.cmp(&a_at),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.posting_id.cmp(&b.posting_id))
}
