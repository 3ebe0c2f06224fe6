use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request for job recommendations
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecommendRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[serde(default)]
    #[validate(range(min = 1))]
    pub limit: Option<u16>,
    #[serde(default)]
    #[serde(alias = "min_score", rename = "minScore")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub min_score: Option<f64>,
    #[serde(default)]
    #[serde(alias = "deadline_ms", rename = "deadlineMs")]
    #[validate(range(min = 1))]
    pub deadline_ms: Option<u64>,
    #[serde(default)]
    #[serde(alias = "require_preferences", rename = "requirePreferences")]
    pub require_preferences: bool,
}
