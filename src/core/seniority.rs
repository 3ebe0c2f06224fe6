use crate::models::{JobPosting, SeniorityBand};

/// Title keywords per band, checked as whole words
const ENTRY_KEYWORDS: &[&str] = &[
    "intern", "internship", "junior", "jr", "entry", "graduate", "grad", "trainee", "apprentice",
];
const MID_KEYWORDS: &[&str] = &["mid", "intermediate"];
const SENIOR_KEYWORDS: &[&str] = &["senior", "sr", "lead"];
const STAFF_KEYWORDS: &[&str] = &["staff", "principal", "distinguished", "fellow"];

/// Infer a seniority band from a job title
///
/// The most senior keyword present wins, so "Senior Staff Engineer"
/// resolves to staff+. Titles without any keyword yield `None`.
pub fn infer_from_title(title: &str) -> Option<SeniorityBand> {
    let lowered = title.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    let has_any = |keywords: &[&str]| words.iter().any(|w| keywords.contains(w));

    if has_any(STAFF_KEYWORDS) {
        Some(SeniorityBand::StaffPlus)
    } else if has_any(SENIOR_KEYWORDS) {
        Some(SeniorityBand::Senior)
    } else if has_any(MID_KEYWORDS) {
        Some(SeniorityBand::Mid)
    } else if has_any(ENTRY_KEYWORDS) {
        Some(SeniorityBand::Entry)
    } else {
        None
    }
}

/// Seniority band of a posting: the explicit field first, then the title
#[inline]
pub fn posting_band(posting: &JobPosting) -> Option<SeniorityBand> {
    posting.seniority.or_else(|| infer_from_title(&posting.title))
}
