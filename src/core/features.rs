use thiserror::Error;
use crate::models::{Contribution, Dimension, JobPosting, PointBudgets, PreferenceProfile};
use crate::core::seniority::posting_band;

/// Compensation midpoints further apart than this fraction score nothing
const COMPENSATION_TOLERANCE: f64 = 0.30;

/// A posting that cannot be scored at all
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralSkip {
    #[error("posting has no identifier")]
    MissingId,

    #[error("posting {0} has no title")]
    MissingTitle(String),
}

/// Compute every non-zero dimension contribution for one (posting, profile) pair
///
/// Contributions come back in dimension declaration order. Missing optional
/// data on either side yields no contribution for that dimension, never an
/// error; only a posting without an id or title is rejected.
pub fn extract_features(
    posting: &JobPosting,
    profile: &PreferenceProfile,
    budgets: &PointBudgets,
) -> Result<Vec<Contribution>, StructuralSkip> {
    if posting.id.trim().is_empty() {
        return Err(StructuralSkip::MissingId);
    }
    if posting.title.trim().is_empty() {
        return Err(StructuralSkip::MissingTitle(posting.id.clone()));
    }

    let contributions = [
        skill_fit(posting, profile, budgets.skills),
        location_fit(posting, profile, budgets.location),
        compensation_fit(posting, profile, budgets.compensation),
        seniority_fit(posting, profile, budgets.seniority),
        employer_size_fit(posting, profile, budgets.employer_size),
    ]
    .into_iter()
    .flatten()
    .filter(|c| c.points > 0.0)
    .collect();

    Ok(contributions)
}

/// Lowercased, trimmed, de-duplicated skill tokens paired with their original spelling
fn normalize_skills(skills: &[String]) -> Vec<(String, &str)> {
    let mut seen: Vec<(String, &str)> = Vec::with_capacity(skills.len());
    for skill in skills {
        let trimmed = skill.trim();
        if trimmed.is_empty() {
            continue;
        }
        let key = trimmed.to_lowercase();
        if !seen.iter().any(|(k, _)| *k == key) {
            seen.push((key, trimmed));
        }
    }
    seen
}

#[inline]
fn skills_match(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

/// Skill overlap: `budget * matching / max(|posting|, |profile|)`
///
/// `matching` counts profile skills that match at least one posting skill,
/// which keeps the ratio at or below one and makes it non-decreasing as
/// overlapping skills are added to the profile.
#[inline]
pub fn skill_fit(
    posting: &JobPosting,
    profile: &PreferenceProfile,
    budget: f64,
) -> Option<Contribution> {
    let posting_skills = normalize_skills(&posting.skills);
    let profile_skills = normalize_skills(&profile.skills);
    if posting_skills.is_empty() || profile_skills.is_empty() {
        return None;
    }

    let matching = profile_skills
        .iter()
        .filter(|(wanted, _)| posting_skills.iter().any(|(required, _)| skills_match(wanted, required)))
        .count();
    if matching == 0 {
        return None;
    }

    let matched_names: Vec<&str> = posting_skills
        .iter()
        .filter(|(required, _)| profile_skills.iter().any(|(wanted, _)| skills_match(wanted, required)))
        .map(|(_, original)| *original)
        .collect();

    let denominator = posting_skills.len().max(profile_skills.len());
    let points = budget * matching as f64 / denominator as f64;

    Some(Contribution {
        dimension: Dimension::Skills,
        points,
        reason: format!(
            "{} of {} skills match: {}",
            matching,
            denominator,
            matched_names.join(", ")
        ),
    })
}

/// Lowercase and collapse whitespace for containment checks
fn normalize_location(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Location fit: binary, either the place matches or a remote role meets a remote preference
#[inline]
pub fn location_fit(
    posting: &JobPosting,
    profile: &PreferenceProfile,
    budget: f64,
) -> Option<Contribution> {
    if let Some(preferred) = profile.preferred_location.as_deref() {
        let preferred = normalize_location(preferred);
        if !preferred.is_empty() && normalize_location(&posting.location).contains(&preferred) {
            return Some(Contribution {
                dimension: Dimension::Location,
                points: budget,
                reason: format!("Located in {}", posting.location.trim()),
            });
        }
    }

    if profile.remote == Some(true) && posting.is_remote() {
        return Some(Contribution {
            dimension: Dimension::Location,
            points: budget,
            reason: "Remote role matches your remote preference".to_string(),
        });
    }

    None
}

/// Compensation fit based on relative distance between range midpoints
#[inline]
pub fn compensation_fit(
    posting: &JobPosting,
    profile: &PreferenceProfile,
    budget: f64,
) -> Option<Contribution> {
    let job_mid = posting.compensation?.midpoint()?;
    let profile_mid = profile.compensation?.midpoint()?;
    if profile_mid <= 0.0 {
        return None;
    }

    let diff = (job_mid - profile_mid).abs() / profile_mid;
    if diff >= COMPENSATION_TOLERANCE {
        return None;
    }

    Some(Contribution {
        dimension: Dimension::Compensation,
        points: budget * (1.0 - diff),
        reason: format!(
            "Salary midpoint within {:.0}% of your target",
            (diff * 100.0).round()
        ),
    })
}

/// Seniority fit: full for the same band, half for an adjacent one
#[inline]
pub fn seniority_fit(
    posting: &JobPosting,
    profile: &PreferenceProfile,
    budget: f64,
) -> Option<Contribution> {
    let wanted = profile.seniority?;
    let offered = posting_band(posting)?;

    match wanted.distance(offered) {
        0 => Some(Contribution {
            dimension: Dimension::Seniority,
            points: budget,
            reason: format!("Seniority matches your {} level", wanted.label()),
        }),
        1 => Some(Contribution {
            dimension: Dimension::Seniority,
            points: budget / 2.0,
            reason: format!(
                "{} role is one level from your {} level",
                offered.label(),
                wanted.label()
            ),
        }),
        _ => None,
    }
}

/// Employer size fit: full when the declared size equals the preference
#[inline]
pub fn employer_size_fit(
    posting: &JobPosting,
    profile: &PreferenceProfile,
    budget: f64,
) -> Option<Contribution> {
    let wanted = profile.employer_size?;
    if posting.employer_size != Some(wanted) {
        return None;
    }

    Some(Contribution {
        dimension: Dimension::EmployerSize,
        points: budget,
        reason: format!("{} employer matches your size preference", wanted.label()),
    })
}
