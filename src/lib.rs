//! Jobmatch - Deterministic job recommendation scoring for the job board
//!
//! This library provides the recommendation engine behind the job board's
//! "jobs for you" feed. Every posting is scored against the seeker's
//! preference profile with fixed, explainable rules, then filtered, ranked
//! and capped by a parallel ranking pipeline.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{score_posting, CancelSignal, RankingPipeline, RecommendError};
pub use models::{
    JobPosting, MatchScore, PointBudgets, PreferenceProfile, RankingOptions, RecommendationResult,
};
