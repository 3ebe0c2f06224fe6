use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Salary range in a single currency
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CompensationRange {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

impl CompensationRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Midpoint of the range, only when both bounds exist and are ordered
    pub fn midpoint(&self) -> Option<f64> {
        match (self.min, self.max) {
            (Some(min), Some(max)) if min <= max => Some((min + max) / 2.0),
            _ => None,
        }
    }
}

/// Seniority bands, ordered from most junior to most senior
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SeniorityBand {
    #[serde(rename = "entry")]
    Entry,
    #[serde(rename = "mid")]
    Mid,
    #[serde(rename = "senior")]
    Senior,
    #[serde(rename = "staff+", alias = "staff")]
    StaffPlus,
}

impl SeniorityBand {
    fn rank(self) -> u8 {
        match self {
            SeniorityBand::Entry => 0,
            SeniorityBand::Mid => 1,
            SeniorityBand::Senior => 2,
            SeniorityBand::StaffPlus => 3,
        }
    }

    /// Number of bands between `self` and `other`
    pub fn distance(self, other: SeniorityBand) -> u8 {
        self.rank().abs_diff(other.rank())
    }

    pub fn label(self) -> &'static str {
        match self {
            SeniorityBand::Entry => "entry",
            SeniorityBand::Mid => "mid",
            SeniorityBand::Senior => "senior",
            SeniorityBand::StaffPlus => "staff+",
        }
    }
}

/// Declared employer size band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmployerSize {
    Startup,
    Small,
    Medium,
    Large,
    Enterprise,
}

impl EmployerSize {
    pub fn label(self) -> &'static str {
        match self {
            EmployerSize::Startup => "startup",
            EmployerSize::Small => "small",
            EmployerSize::Medium => "medium",
            EmployerSize::Large => "large",
            EmployerSize::Enterprise => "enterprise",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    FullTime,
    PartTime,
    Contract,
    Internship,
    Temporary,
}

/// Treat an explicit `null` the same as a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Open job posting as supplied by the document store
///
/// `id` and `title` default to empty so that incomplete documents still
/// reach the ranking pipeline and get counted as skips.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    #[serde(rename = "jobId", default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(default)]
    pub compensation: Option<CompensationRange>,
    #[serde(rename = "requiredSkills", default, deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    #[serde(rename = "employmentType", default)]
    pub employment_type: Option<EmploymentType>,
    #[serde(rename = "employerId", default, deserialize_with = "null_as_default")]
    pub employer_id: String,
    #[serde(rename = "employerSize", default)]
    pub employer_size: Option<EmployerSize>,
    #[serde(rename = "isRemote", default, deserialize_with = "null_as_default")]
    pub remote: bool,
    #[serde(default)]
    pub seniority: Option<SeniorityBand>,
    #[serde(rename = "postedAt", default)]
    pub posted_at: Option<DateTime<Utc>>,
}

impl JobPosting {
    /// A posting is marked remote either explicitly or through its location
    pub fn is_remote(&self) -> bool {
        self.remote || self.location.to_lowercase().contains("remote")
    }
}

/// Job seeker preferences used for scoring
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreferenceProfile {
    #[serde(rename = "subjectId", alias = "userId", default, deserialize_with = "null_as_default")]
    pub subject_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    #[serde(rename = "preferredLocation", default)]
    pub preferred_location: Option<String>,
    #[serde(rename = "desiredCompensation", default)]
    pub compensation: Option<CompensationRange>,
    #[serde(rename = "seniorityBand", default)]
    pub seniority: Option<SeniorityBand>,
    #[serde(rename = "employerSizePreference", default)]
    pub employer_size: Option<EmployerSize>,
    #[serde(rename = "remotePreference", default)]
    pub remote: Option<bool>,
}

impl PreferenceProfile {
    pub fn new(subject_id: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
            ..Self::default()
        }
    }

    /// True when at least one preference field carries data
    pub fn has_preferences(&self) -> bool {
        self.skills.iter().any(|s| !s.trim().is_empty())
            || self
                .preferred_location
                .as_deref()
                .is_some_and(|l| !l.trim().is_empty())
            || self
                .compensation
                .is_some_and(|c| c.min.is_some() || c.max.is_some())
            || self.seniority.is_some()
            || self.employer_size.is_some()
            || self.remote.is_some()
    }
}

/// Scoring dimensions in declaration order; the order breaks reason ties
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Skills,
    Location,
    Compensation,
    Seniority,
    EmployerSize,
}

/// One non-zero dimension contribution with its explanation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub dimension: Dimension,
    pub points: f64,
    pub reason: String,
}

/// Scored posting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchScore {
    #[serde(rename = "jobId")]
    pub posting_id: String,
    #[serde(rename = "score")]
    pub total: f64,
    #[serde(rename = "reasons")]
    pub contributions: Vec<Contribution>,
    #[serde(rename = "postedAt")]
    pub posted_at: Option<DateTime<Utc>>,
}

/// Ranked output of one pipeline run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub results: Vec<MatchScore>,
    #[serde(rename = "skippedCount")]
    pub skipped_count: usize,
    pub partial: bool,
}

/// Maximum points each dimension may contribute
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointBudgets {
    pub skills: f64,
    pub location: f64,
    pub compensation: f64,
    pub seniority: f64,
    pub employer_size: f64,
}

impl PointBudgets {
    pub fn total(&self) -> f64 {
        self.skills + self.location + self.compensation + self.seniority + self.employer_size
    }
}

impl Default for PointBudgets {
    fn default() -> Self {
        Self {
            skills: 40.0,
            location: 25.0,
            compensation: 20.0,
            seniority: 15.0,
            employer_size: 10.0,
        }
    }
}

/// Per-call ranking parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingOptions {
    pub min_score_threshold: f64,
    pub limit: usize,
    /// Reject profiles that carry no preference data at all
    pub require_preferences: bool,
}

impl Default for RankingOptions {
    fn default() -> Self {
        Self {
            min_score_threshold: 20.0,
            limit: 20,
            require_preferences: false,
        }
    }
}

/// Filter context handed to the posting source
#[derive(Debug, Clone, Default)]
pub struct PostingQuery {
    pub subject_id: String,
    pub limit: Option<usize>,
}
