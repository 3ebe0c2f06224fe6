use async_trait::async_trait;
use thiserror::Error;
use crate::models::{JobPosting, PostingQuery, PreferenceProfile};

/// Errors reported by posting and profile sources
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Source unavailable: {0}")]
    Unavailable(String),
}

/// Supplies candidate postings for a recommendation request
///
/// Pagination and active-only filtering are the source's responsibility.
#[async_trait]
pub trait PostingSource: Send + Sync {
    async fn fetch_postings(&self, query: &PostingQuery) -> Result<Vec<JobPosting>, SourceError>;
}

/// Supplies the caller's preference profile
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn fetch_profile(&self, subject_id: &str) -> Result<PreferenceProfile, SourceError>;
}

/// In-memory posting and profile source
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    pub postings: Vec<JobPosting>,
    pub profiles: Vec<PreferenceProfile>,
}

impl StaticSource {
    pub fn new(postings: Vec<JobPosting>, profiles: Vec<PreferenceProfile>) -> Self {
        Self { postings, profiles }
    }
}

#[async_trait]
impl PostingSource for StaticSource {
    async fn fetch_postings(&self, query: &PostingQuery) -> Result<Vec<JobPosting>, SourceError> {
        let limit = query.limit.unwrap_or(self.postings.len());
        Ok(self.postings.iter().take(limit).cloned().collect())
    }
}

#[async_trait]
impl ProfileSource for StaticSource {
    async fn fetch_profile(&self, subject_id: &str) -> Result<PreferenceProfile, SourceError> {
        self.profiles
            .iter()
            .find(|p| p.subject_id == subject_id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(format!("Profile not found for user {}", subject_id)))
    }
}
