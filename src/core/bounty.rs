use crate::models::RawIssue;

/// Signals that mark an issue as bounty-bearing
const BOUNTY_TERMS: [&str; 3] = ["bounty", "reward", "paid"];

/// Classify an issue as bounty-bearing
///
/// An issue qualifies when any label name, lower-cased, is exactly one of
/// `bounty`, `reward` or `paid`, or when the lower-cased title contains one
/// of those words as a substring.
///
/// This is a heuristic with known false positives (a title saying
/// "no reward expected" still classifies); correcting that is a product
/// decision, not something to patch silently here.
#[inline]
pub fn is_bounty(issue: &RawIssue) -> bool {
    if issue
        .labels
        .iter()
        .any(|label| BOUNTY_TERMS.contains(&label.name.to_lowercase().as_str()))
    {
        return true;
    }

    let title = issue.title.to_lowercase();
    BOUNTY_TERMS.iter().any(|term| title.contains(term))
}
