use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use crate::models::{JobPosting, PostingQuery, PreferenceProfile};
use crate::services::source::{PostingSource, ProfileSource, SourceError};

/// Errors that can occur when interacting with Appwrite
#[derive(Debug, Error)]
pub enum AppwriteError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid API key or token")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

impl From<AppwriteError> for SourceError {
    fn from(err: AppwriteError) -> Self {
        match err {
            AppwriteError::NotFound(msg) => SourceError::NotFound(msg),
            other => SourceError::Unavailable(other.to_string()),
        }
    }
}

/// Appwrite API client
///
/// Reads job postings and preference profiles from the document store.
/// It is the production posting and profile source of the recommendation
/// service.
pub struct AppwriteClient {
    base_url: String,
    api_key: String,
    project_id: String,
    database_id: String,
    client: Client,
    collections: AppwriteCollections,
}

/// Collection IDs in Appwrite
#[derive(Debug, Clone)]
pub struct AppwriteCollections {
    pub job_postings: String,
    pub preference_profiles: String,
}

impl AppwriteClient {
    /// Create a new Appwrite client
    pub fn new(
        base_url: String,
        api_key: String,
        project_id: String,
        database_id: String,
        collections: AppwriteCollections,
        timeout: Duration,
    ) -> Result<Self, AppwriteError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            api_key,
            project_id,
            database_id,
            client,
            collections,
        })
    }

    fn documents_url(&self, collection: &str, queries: &[String]) -> String {
        let queries_json = Value::from(queries.to_vec()).to_string();
        format!(
            "{}/databases/{}/collections/{}/documents?query={}",
            self.base_url.trim_end_matches('/'),
            self.database_id,
            collection,
            urlencoding::encode(&queries_json)
        )
    }

    /// Fetch the raw documents array of a collection query
    async fn list_documents(&self, collection: &str, queries: &[String]) -> Result<Vec<Value>, AppwriteError> {
        let url = self.documents_url(collection, queries);

        tracing::debug!("Listing documents from: {}", url);

        let response = self
            .client
            .get(&url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AppwriteError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Appwrite query on {} failed: {} - {}", collection, status, body);
            return Err(AppwriteError::ApiError(format!(
                "Failed to list {}: {}",
                collection, status
            )));
        }

        let mut json: Value = response.json().await?;

        match json.get_mut("documents").map(Value::take) {
            Some(Value::Array(documents)) => Ok(documents),
            _ => Err(AppwriteError::InvalidResponse("Missing documents array".into())),
        }
    }

    /// Fetch the preference profile for a given subject
    pub async fn get_profile(&self, subject_id: &str) -> Result<PreferenceProfile, AppwriteError> {
        // quoted as a JSON string so ids containing quotes stay one value
        let queries = vec![
            format!("equal(\"subjectId\", {})", Value::from(subject_id)),
            "limit(1)".to_string(),
        ];

        tracing::debug!("Fetching preference profile for: {}", subject_id);

        let documents = self
            .list_documents(&self.collections.preference_profiles, &queries)
            .await?;

        let doc = documents
            .into_iter()
            .next()
            .ok_or_else(|| AppwriteError::NotFound(format!("Profile not found for user {}", subject_id)))?;

        parse_document(doc)
            .map_err(|e| AppwriteError::InvalidResponse(format!("Failed to parse profile: {}", e)))
    }

    /// Query active job postings
    ///
    /// Documents that do not deserialize are dropped with a warning; postings
    /// merely missing an id or title are kept so ranking can count them.
    pub async fn query_postings(&self, query: &PostingQuery) -> Result<Vec<JobPosting>, AppwriteError> {
        let mut queries = vec![
            "equal(\"isActive\", true)".to_string(),
            "orderDesc(\"postedAt\")".to_string(),
        ];
        if let Some(limit) = query.limit {
            queries.push(format!("limit({})", limit));
        }

        let documents = self
            .list_documents(&self.collections.job_postings, &queries)
            .await?;
        let total = documents.len();

        let postings: Vec<JobPosting> = documents
            .into_iter()
            .filter_map(|doc| match parse_document::<JobPosting>(doc) {
                Ok(posting) => Some(posting),
                Err(e) => {
                    tracing::warn!("Dropping malformed job posting document: {}", e);
                    None
                }
            })
            .collect();

        tracing::debug!(
            "Queried {} postings for {} ({} documents)",
            postings.len(),
            query.subject_id,
            total
        );

        Ok(postings)
    }
}

/// Deserialize a document, unwrapping a nested `data` object when present
fn parse_document<T: DeserializeOwned>(mut doc: Value) -> Result<T, serde_json::Error> {
    let data = match doc.get_mut("data").map(Value::take) {
        Some(inner @ Value::Object(_)) => inner,
        _ => doc,
    };
    serde_json::from_value(data)
}

#[async_trait]
impl PostingSource for AppwriteClient {
    async fn fetch_postings(&self, query: &PostingQuery) -> Result<Vec<JobPosting>, SourceError> {
        Ok(self.query_postings(query).await?)
    }
}

#[async_trait]
impl ProfileSource for AppwriteClient {
    async fn fetch_profile(&self, subject_id: &str) -> Result<PreferenceProfile, SourceError> {
        Ok(self.get_profile(subject_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn create_client(base_url: String) -> AppwriteClient {
        let collections = AppwriteCollections {
            job_postings: "job_postings".to_string(),
            preference_profiles: "preference_profiles".to_string(),
        };

        AppwriteClient::new(
            base_url,
            "test_key".to_string(),
            "test_project".to_string(),
            "test_db".to_string(),
            collections,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_appwrite_client_creation() {
        let client = create_client("https://appwrite.test/v1/".to_string());

        assert_eq!(client.api_key, "test_key");
        let url = client.documents_url("job_postings", &["limit(1)".to_string()]);
        assert!(url.starts_with("https://appwrite.test/v1/databases/test_db/collections/job_postings/documents?query="));
    }

    #[tokio::test]
    async fn test_query_postings_keeps_incomplete_and_drops_malformed() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/databases/test_db/collections/job_postings/documents")
            .match_query(Matcher::Any)
            .match_header("X-Appwrite-Key", "test_key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                serde_json::json!({
                    "total": 5,
                    "documents": [
                        {"jobId": "j1", "title": "Rust Engineer", "requiredSkills": ["Rust"]},
                        {"jobId": "j2", "requiredSkills": ["Go"]},
                        {"jobId": "j3", "title": "Broken", "requiredSkills": "not-a-list"},
                        {"jobId": "j4", "title": "Rust Engineer", "location": null, "employerId": null, "requiredSkills": ["Rust"]},
                        {"jobId": "j5", "title": null, "location": "Berlin", "requiredSkills": null}
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = create_client(server.url());
        let postings = client
            .query_postings(&PostingQuery {
                subject_id: "seeker".to_string(),
                limit: Some(10),
            })
            .await
            .unwrap();

        mock.assert_async().await;
        let ids: Vec<&str> = postings.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["j1", "j2", "j4", "j5"]);
        assert!(postings[1].title.is_empty());

        // null attributes score like missing ones; a null title is a skip
        let profile = PreferenceProfile {
            skills: vec!["rust".to_string()],
            ..PreferenceProfile::new("seeker")
        };
        let result = crate::core::RankingPipeline::default()
            .recommend(&profile, &postings, &crate::models::RankingOptions::default(), None)
            .unwrap();
        let ranked: Vec<&str> = result.results.iter().map(|m| m.posting_id.as_str()).collect();
        assert_eq!(ranked, vec!["j1", "j4"]);
        assert_eq!(result.skipped_count, 2);
    }

    #[tokio::test]
    async fn test_profile_query_escapes_subject_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/databases/test_db/collections/preference_profiles/documents")
            .match_query(Matcher::UrlEncoded(
                "query".into(),
                serde_json::json!([r#"equal("subjectId", "say \"hi\"")"#, "limit(1)"]).to_string(),
            ))
            .with_status(200)
            .with_body(r#"{"total": 0, "documents": []}"#)
            .create_async()
            .await;

        let client = create_client(server.url());
        let err = client.get_profile(r#"say "hi""#).await.unwrap_err();

        mock.assert_async().await;
        assert!(matches!(err, AppwriteError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_get_profile_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/databases/test_db/collections/preference_profiles/documents")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"total": 0, "documents": []}"#)
            .create_async()
            .await;

        let client = create_client(server.url());
        let err = client.get_profile("ghost").await.unwrap_err();

        assert!(matches!(err, AppwriteError::NotFound(_)));
        assert!(matches!(SourceError::from(err), SourceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_get_profile_from_nested_data() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/databases/test_db/collections/preference_profiles/documents")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                serde_json::json!({
                    "documents": [{
                        "$id": "doc-1",
                        "data": {
                            "subjectId": "seeker",
                            "skills": ["Rust"],
                            "seniorityBand": "senior",
                            "remotePreference": true
                        }
                    }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = create_client(server.url());
        let profile = client.get_profile("seeker").await.unwrap();

        assert_eq!(profile.subject_id, "seeker");
        assert_eq!(profile.remote, Some(true));
    }

    #[tokio::test]
    async fn test_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/databases/test_db/collections/job_postings/documents")
            .match_query(Matcher::Any)
            .with_status(401)
            .create_async()
            .await;

        let client = create_client(server.url());
        let err = client.query_postings(&PostingQuery::default()).await.unwrap_err();

        assert!(matches!(err, AppwriteError::Unauthorized));
    }
}
