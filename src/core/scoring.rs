use crate::models::{JobPosting, MatchScore, PointBudgets, PreferenceProfile};
use crate::core::features::{extract_features, StructuralSkip};

/// Score one posting against a profile (0-100)
///
/// Sums the dimension contributions from the feature extractor and clamps
/// the total to [0, 100]. Reasons are ordered by descending points; equal
/// points fall back to dimension declaration order (skills, location,
/// compensation, seniority, employer size).
///
/// Pure function: safe to call from any number of workers at once.
pub fn score_posting(
    posting: &JobPosting,
    profile: &PreferenceProfile,
    budgets: &PointBudgets,
) -> Result<MatchScore, StructuralSkip> {
    let mut contributions = extract_features(posting, profile, budgets)?;

    let total: f64 = contributions.iter().map(|c| c.points).sum();

    // extract_features yields declaration order, so a stable sort keeps it for ties
    contributions.sort_by(|a, b| b.points.total_cmp(&a.points));

    Ok(MatchScore {
        posting_id: posting.id.clone(),
        total: total.clamp(0.0, 100.0),
        contributions,
        posted_at: posting.posted_at,
    })
}
