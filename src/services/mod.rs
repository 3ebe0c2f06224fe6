// Service exports
pub mod appwrite;
pub mod cache;
pub mod recommendation;
pub mod source;

pub use appwrite::{AppwriteClient, AppwriteCollections, AppwriteError};
pub use cache::{CacheKey, RecommendationCache};
pub use recommendation::{Recommendation, RecommendationError, RecommendationService};
pub use source::{PostingSource, ProfileSource, SourceError, StaticSource};
