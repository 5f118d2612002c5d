use crate::core::{
    bounty::is_bounty,
    filters::{matches_followed, post_filter},
    scoring::{match_score, relevance_score},
};
use crate::models::{
    EnrichedIssue, FilterSet, RawIssue, RepositoryDetail, ScoreWeights, SortBy, SortOrder,
    UserProfile,
};

/// Feed assembly pipeline
///
/// Takes the raw issue/repository pairs produced by the fetcher and runs
/// them through enrichment, post-filtering, classification, scoring and a
/// stable sort. Everything here is request-scoped and pure; nothing is
/// persisted between requests.
#[derive(Debug, Clone)]
pub struct FeedEngine {
    weights: ScoreWeights,
}

impl FeedEngine {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoreWeights::default(),
        }
    }

    /// Join a raw issue with its repository metadata and derive the
    /// classification and score fields. The enriched issue is immutable
    /// once built.
    pub fn enrich(
        &self,
        issue: RawIssue,
        repo: &RepositoryDetail,
        profile: Option<&UserProfile>,
    ) -> EnrichedIssue {
        let bounty = is_bounty(&issue);
        let score = relevance_score(bounty, repo, issue.updated_at, &self.weights);

        let (match_score, match_reasons) = match profile {
            Some(profile) => {
                let (score, reasons) = match_score(&issue, repo, profile);
                (Some(score), Some(reasons))
            }
            None => (None, None),
        };

        EnrichedIssue {
            id: issue.id,
            number: issue.number,
            labels: issue.label_names(),
            title: issue.title,
            body: issue.body,
            state: issue.state,
            comments: issue.comments,
            html_url: issue.html_url,
            repo_full_name: repo.full_name.clone(),
            language: repo.language.clone(),
            stars: repo.stars,
            forks: repo.forks,
            owner_login: repo.owner.login.clone(),
            owner_type: repo.owner.kind.clone(),
            is_bounty: bounty,
            score,
            match_score,
            match_reasons,
            opened_at: issue.created_at,
            updated_at: issue.updated_at,
        }
    }

    /// Build the full, sorted feed from fetched issue/repository pairs
    ///
    /// Stages: enrich, followed-only filter, language/star post-filter,
    /// bounty-only filter, stable sort. Without a profile the followed-only
    /// filter matches nothing, since there is no followed set to match
    /// against.
    pub fn assemble(
        &self,
        pairs: Vec<(RawIssue, RepositoryDetail)>,
        filters: &FilterSet,
        profile: Option<&UserProfile>,
        sort_by: SortBy,
        sort_order: SortOrder,
    ) -> Vec<EnrichedIssue> {
        let mut issues: Vec<EnrichedIssue> = pairs
            .into_iter()
            .map(|(issue, repo)| self.enrich(issue, &repo, profile))
            .collect();

        if filters.followed_only {
            match profile {
                Some(profile) => issues.retain(|issue| matches_followed(issue, profile)),
                None => issues.clear(),
            }
        }

        let mut issues = post_filter(issues, filters);

        if filters.bounty_only {
            issues.retain(|issue| issue.is_bounty);
        }

        sort_issues(&mut issues, sort_by, sort_order);
        issues
    }
}

impl Default for FeedEngine {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

/// Stable sort over the enriched set
///
/// Descending order reverses the comparison, not the final list, so issues
/// that compare equal keep their original fetch order in both directions.
pub fn sort_issues(issues: &mut [EnrichedIssue], sort_by: SortBy, sort_order: SortOrder) {
    issues.sort_by(|a, b| {
        let ordering = match sort_by {
            SortBy::Score => a.score.cmp(&b.score),
            SortBy::Stars => a.stars.cmp(&b.stars),
            SortBy::OpenedAt => a.opened_at.cmp(&b.opened_at),
            SortBy::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        };
        match sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IssueLabel, RepoOwner};
    use chrono::{Duration, Utc};

    fn create_pair(
        id: u64,
        title: &str,
        labels: &[&str],
        stars: u32,
        updated_days_ago: i64,
    ) -> (RawIssue, RepositoryDetail) {
        let issue = RawIssue {
            id,
            number: id,
            title: title.to_string(),
            body: None,
            labels: labels
                .iter()
                .map(|name| IssueLabel {
                    name: name.to_string(),
                    color: None,
                })
                .collect(),
            state: "open".to_string(),
            comments: 0,
            assignee: None,
            created_at: Utc::now() - Duration::days(30),
            updated_at: Utc::now() - Duration::days(updated_days_ago),
            html_url: format!("https://github.com/acme/widget/issues/{}", id),
            repository_url: "https://api.github.com/repos/acme/widget".to_string(),
        };
        let repo = RepositoryDetail {
            full_name: "acme/widget".to_string(),
            language: Some("Rust".to_string()),
            stars,
            forks: 1,
            open_issues: 5,
            owner: RepoOwner {
                login: "acme".to_string(),
                kind: "Organization".to_string(),
            },
            updated_at: None,
            html_url: "https://github.com/acme/widget".to_string(),
        };
        (issue, repo)
    }

    #[test]
    fn test_assemble_scores_and_sorts_desc() {
        let engine = FeedEngine::with_default_weights();
        let pairs = vec![
            create_pair(1, "Quiet issue", &[], 50, 20),
            create_pair(2, "Fix crash", &["bounty"], 1500, 0),
        ];

        let feed = engine.assemble(
            pairs,
            &FilterSet::default(),
            None,
            SortBy::Score,
            SortOrder::Desc,
        );

        assert_eq!(feed.len(), 2);
        // bounty (50) + >100 stars (20) + >1000 stars (30) + fresh (20)
        assert_eq!(feed[0].id, 2);
        assert_eq!(feed[0].score, 120);
        assert_eq!(feed[1].score, 0);
    }

    #[test]
    fn test_sort_ties_keep_fetch_order_both_directions() {
        let engine = FeedEngine::with_default_weights();
        let pairs = vec![
            create_pair(1, "First", &[], 10, 20),
            create_pair(2, "Second", &[], 10, 20),
        ];

        let mut asc = engine
            .assemble(
                pairs.clone(),
                &FilterSet::default(),
                None,
                SortBy::Score,
                SortOrder::Asc,
            )
            .iter()
            .map(|i| i.id)
            .collect::<Vec<_>>();
        assert_eq!(asc, vec![1, 2]);

        asc = engine
            .assemble(
                pairs,
                &FilterSet::default(),
                None,
                SortBy::Score,
                SortOrder::Desc,
            )
            .iter()
            .map(|i| i.id)
            .collect::<Vec<_>>();
        assert_eq!(asc, vec![1, 2]);
    }

    #[test]
    fn test_bounty_only_retains_classified_issues() {
        let engine = FeedEngine::with_default_weights();
        let pairs = vec![
            create_pair(1, "Fix crash", &["bounty"], 10, 1),
            create_pair(2, "Improve docs", &[], 10, 1),
        ];
        let filters = FilterSet {
            bounty_only: true,
            ..FilterSet::default()
        };

        let feed = engine.assemble(pairs, &filters, None, SortBy::Score, SortOrder::Desc);
        assert_eq!(feed.len(), 1);
        assert!(feed[0].is_bounty);
    }

    #[test]
    fn test_followed_only_without_profile_matches_nothing() {
        let engine = FeedEngine::with_default_weights();
        let pairs = vec![create_pair(1, "Fix crash", &[], 10, 1)];
        let filters = FilterSet {
            followed_only: true,
            ..FilterSet::default()
        };

        let feed = engine.assemble(pairs, &filters, None, SortBy::Score, SortOrder::Desc);
        assert!(feed.is_empty());
    }

    #[test]
    fn test_followed_only_with_profile() {
        let engine = FeedEngine::with_default_weights();
        let pairs = vec![create_pair(1, "Fix crash", &[], 10, 1)];
        let filters = FilterSet {
            followed_only: true,
            ..FilterSet::default()
        };
        let profile = UserProfile {
            user_id: "u1".to_string(),
            languages: vec![],
            topics: vec![],
            followed_repos: vec![],
            followed_orgs: vec!["acme".to_string()],
            default_labels: vec![],
            min_stars: None,
            updated_at: None,
        };

        let feed = engine.assemble(pairs, &filters, Some(&profile), SortBy::Score, SortOrder::Desc);
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].match_score, Some(25));
    }

    #[test]
    fn test_sort_by_stars() {
        let engine = FeedEngine::with_default_weights();
        let mut high = create_pair(1, "Popular", &[], 9000, 20);
        high.1.stars = 9000;
        let low = create_pair(2, "Obscure", &[], 3, 20);

        let feed = engine.assemble(
            vec![low, high],
            &FilterSet::default(),
            None,
            SortBy::Stars,
            SortOrder::Desc,
        );
        assert_eq!(feed[0].stars, 9000);
    }
}
