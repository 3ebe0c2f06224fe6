// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    CompensationRange, Contribution, Dimension, EmployerSize, EmploymentType, JobPosting,
    MatchScore, PointBudgets, PostingQuery, PreferenceProfile, RankingOptions,
    RecommendationResult, SeniorityBand,
};
pub use requests::RecommendRequest;
pub use responses::{ErrorResponse, HealthResponse, RecommendResponse};
