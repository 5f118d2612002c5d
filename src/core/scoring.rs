use chrono::{DateTime, Utc};

use crate::models::{RawIssue, RepositoryDetail, ScoreWeights, UserProfile};

/// Match-score bonus when the repository language is one of the profile's
const LANGUAGE_BONUS: u32 = 30;
/// Match-score bonus for a followed repository
const FOLLOWED_REPO_BONUS: u32 = 25;
/// Match-score bonus for a followed organization
const FOLLOWED_ORG_BONUS: u32 = 25;
/// Match-score bonus per topic keyword found in the issue text
const TOPIC_BONUS: u32 = 10;

/// Compute the general relevance score for an issue
///
/// Additive bonuses: bounty, repository popularity and update recency.
/// The star tiers stack - a repository above 1000 stars earns both the
/// >100 and the >1000 bonus. Recency uses wall-clock time at evaluation,
/// so the same issue scores differently as time passes; scores are never
/// persisted.
pub fn relevance_score(
    is_bounty: bool,
    repo: &RepositoryDetail,
    updated_at: DateTime<Utc>,
    weights: &ScoreWeights,
) -> u32 {
    let mut score = 0;

    if is_bounty {
        score += weights.bounty;
    }

    if repo.stars > 100 {
        score += weights.stars_over_100;
    }
    if repo.stars > 1000 {
        score += weights.stars_over_1000;
    }

    let days = days_since(updated_at);
    if days < 1.0 {
        score += weights.updated_within_day;
    } else if days < 7.0 {
        score += weights.updated_within_week;
    }

    score
}

/// Fractional days elapsed since the given timestamp
#[inline]
fn days_since(timestamp: DateTime<Utc>) -> f64 {
    let elapsed = (Utc::now() - timestamp).num_seconds().max(0);
    elapsed as f64 / 86_400.0
}

/// Compute the personalization match score and its human-readable reasons
///
/// An independent axis from the relevance score; the two are never combined.
/// Reasons are appended in a fixed order: language, followed repository,
/// followed organization, topic matches.
pub fn match_score(
    issue: &RawIssue,
    repo: &RepositoryDetail,
    profile: &UserProfile,
) -> (u32, Vec<String>) {
    let mut score = 0;
    let mut reasons = Vec::new();

    if let Some(language) = repo.language.as_deref() {
        if profile
            .languages
            .iter()
            .any(|preferred| preferred.eq_ignore_ascii_case(language))
        {
            score += LANGUAGE_BONUS;
            reasons.push(format!("Written in {}, one of your languages", language));
        }
    }

    if profile
        .followed_repos
        .iter()
        .any(|followed| followed.eq_ignore_ascii_case(&repo.full_name))
    {
        score += FOLLOWED_REPO_BONUS;
        reasons.push(format!("From {}, a repository you follow", repo.full_name));
    }

    if profile
        .followed_orgs
        .iter()
        .any(|followed| followed.eq_ignore_ascii_case(&repo.owner.login))
    {
        score += FOLLOWED_ORG_BONUS;
        reasons.push(format!(
            "From {}, an organization you follow",
            repo.owner.login
        ));
    }

    let haystack = format!(
        "{} {}",
        issue.title,
        issue.body.as_deref().unwrap_or_default()
    )
    .to_lowercase();

    let topic_hits = profile
        .topics
        .iter()
        .filter(|topic| !topic.is_empty() && haystack.contains(&topic.to_lowercase()))
        .count();

    if topic_hits > 0 {
        score += TOPIC_BONUS * topic_hits as u32;
        reasons.push(format!("Matches {} of your topics", topic_hits));
    }

    (score, reasons)
}
