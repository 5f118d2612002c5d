use crate::models::{EnrichedIssue, FilterSet, UserProfile};

/// Language predicate for the post-filter stage
///
/// An issue passes if, for any requested language, the language appears as a
/// case-insensitive substring of the repository full name OR equals the
/// repository's primary language case-insensitively. The dual heuristic is
/// intentional - repository naming conventions often encode the language
/// (e.g. `foo-golang`) even when GitHub reports none.
#[inline]
pub fn matches_language(issue: &EnrichedIssue, languages: &[String]) -> bool {
    if languages.is_empty() {
        return true;
    }

    let repo_name = issue.repo_full_name.to_lowercase();
    let repo_language = issue.language.as_deref().map(str::to_lowercase);

    languages.iter().any(|requested| {
        let requested = requested.to_lowercase();
        repo_name.contains(&requested) || repo_language.as_deref() == Some(requested.as_str())
    })
}

/// Star-count predicate; a missing star count was already coerced to 0 at
/// the fetch boundary.
#[inline]
pub fn matches_star_bounds(issue: &EnrichedIssue, filters: &FilterSet) -> bool {
    if let Some(min) = filters.min_stars {
        if issue.stars < min {
            return false;
        }
    }
    if let Some(max) = filters.max_stars {
        if issue.stars > max {
            return false;
        }
    }
    true
}

/// Followed-only predicate: the repository is in the profile's followed
/// repos, or its owner is in the followed orgs (case-insensitive).
#[inline]
pub fn matches_followed(issue: &EnrichedIssue, profile: &UserProfile) -> bool {
    profile
        .followed_repos
        .iter()
        .any(|repo| repo.eq_ignore_ascii_case(&issue.repo_full_name))
        || profile
            .followed_orgs
            .iter()
            .any(|org| org.eq_ignore_ascii_case(&issue.owner_login))
}

/// Apply the filters the upstream search grammar cannot express
///
/// Pure and order-preserving; surviving records are returned unchanged.
pub fn post_filter(issues: Vec<EnrichedIssue>, filters: &FilterSet) -> Vec<EnrichedIssue> {
    issues
        .into_iter()
        .filter(|issue| matches_language(issue, &filters.languages))
        .filter(|issue| matches_star_bounds(issue, filters))
        .collect()
}

/// Merge default filters with user-supplied overrides
///
/// Produces a fresh FilterSet; neither input is mutated. A field set in the
/// overrides wins; an unset override falls back to the default.
pub fn merge_filters(defaults: &FilterSet, overrides: &FilterSet) -> FilterSet {
    FilterSet {
        languages: pick_list(&defaults.languages, &overrides.languages),
        labels: pick_list(&defaults.labels, &overrides.labels),
        min_stars: overrides.min_stars.or(defaults.min_stars),
        max_stars: overrides.max_stars.or(defaults.max_stars),
        orgs: pick_list(&defaults.orgs, &overrides.orgs),
        repos: pick_list(&defaults.repos, &overrides.repos),
        bounty_only: overrides.bounty_only || defaults.bounty_only,
        followed_only: overrides.followed_only || defaults.followed_only,
    }
}

fn pick_list(default: &[String], overriding: &[String]) -> Vec<String> {
    if overriding.is_empty() {
        default.to_vec()
    } else {
        overriding.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn create_enriched(repo_full_name: &str, language: Option<&str>, stars: u32) -> EnrichedIssue {
        EnrichedIssue {
            id: 1,
            number: 1,
            title: "Test".to_string(),
            body: None,
            labels: vec![],
            state: "open".to_string(),
            comments: 0,
            html_url: format!("https://github.com/{}/issues/1", repo_full_name),
            repo_full_name: repo_full_name.to_string(),
            language: language.map(str::to_string),
            stars,
            forks: 0,
            owner_login: repo_full_name.split('/').next().unwrap_or("").to_string(),
            owner_type: "Organization".to_string(),
            is_bounty: false,
            score: 0,
            match_score: None,
            match_reasons: None,
            opened_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_language_exact_match_case_insensitive() {
        let issue = create_enriched("acme/widget", Some("Go"), 10);
        assert!(matches_language(&issue, &["go".to_string()]));
        assert!(matches_language(&issue, &["GO".to_string()]));
    }

    #[test]
    fn test_language_substring_on_repo_name() {
        // "golang" is not the reported language, but appears in the repo name
        let in_name = create_enriched("acme/widget-golang", Some("Go"), 10);
        assert!(matches_language(&in_name, &["golang".to_string()]));

        let not_in_name = create_enriched("acme/widget", Some("Go"), 10);
        assert!(!matches_language(&not_in_name, &["golang".to_string()]));
    }

    #[test]
    fn test_language_open_filter_when_empty() {
        let issue = create_enriched("acme/widget", None, 10);
        assert!(matches_language(&issue, &[]));
    }

    #[test]
    fn test_star_bounds_inclusive() {
        let issue = create_enriched("acme/widget", None, 100);
        let filters = FilterSet {
            min_stars: Some(100),
            max_stars: Some(100),
            ..FilterSet::default()
        };
        assert!(matches_star_bounds(&issue, &filters));

        let below = create_enriched("acme/widget", None, 99);
        assert!(!matches_star_bounds(&below, &filters));
    }

    #[test]
    fn test_post_filter_preserves_order() {
        let issues = vec![
            create_enriched("acme/alpha", Some("Rust"), 50),
            create_enriched("acme/beta", Some("Go"), 500),
            create_enriched("acme/gamma", Some("Rust"), 5000),
        ];
        let filters = FilterSet {
            languages: vec!["rust".to_string()],
            ..FilterSet::default()
        };

        let filtered = post_filter(issues, &filters);
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].repo_full_name, "acme/alpha");
        assert_eq!(filtered[1].repo_full_name, "acme/gamma");
    }

    #[test]
    fn test_matches_followed_by_repo_or_org() {
        let issue = create_enriched("tokio-rs/tokio", Some("Rust"), 10_000);

        let by_repo = UserProfile {
            user_id: "u1".to_string(),
            languages: vec![],
            topics: vec![],
            followed_repos: vec!["Tokio-RS/Tokio".to_string()],
            followed_orgs: vec![],
            default_labels: vec![],
            min_stars: None,
            updated_at: None,
        };
        assert!(matches_followed(&issue, &by_repo));

        let by_org = UserProfile {
            followed_repos: vec![],
            followed_orgs: vec!["tokio-rs".to_string()],
            ..by_repo.clone()
        };
        assert!(matches_followed(&issue, &by_org));

        let neither = UserProfile {
            followed_repos: vec![],
            followed_orgs: vec![],
            ..by_repo
        };
        assert!(!matches_followed(&issue, &neither));
    }

    #[test]
    fn test_merge_filters_is_pure_and_override_wins() {
        let defaults = FilterSet {
            labels: vec!["good first issue".to_string()],
            min_stars: Some(50),
            ..FilterSet::default()
        };
        let overrides = FilterSet {
            labels: vec!["help wanted".to_string()],
            ..FilterSet::default()
        };

        let merged = merge_filters(&defaults, &overrides);
        assert_eq!(merged.labels, vec!["help wanted"]);
        assert_eq!(merged.min_stars, Some(50));

        // inputs untouched
        assert_eq!(defaults.labels, vec!["good first issue"]);
        assert_eq!(overrides.min_stars, None);
    }
}
