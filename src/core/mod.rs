// Core algorithm exports
pub mod cancel;
pub mod features;
pub mod ranking;
pub mod scoring;
pub mod seniority;

pub use cancel::CancelSignal;
pub use features::{extract_features, StructuralSkip};
pub use ranking::{rank, validate_profile, RankingPipeline, RecommendError};
pub use scoring::score_posting;
pub use seniority::{infer_from_title, posting_band};
