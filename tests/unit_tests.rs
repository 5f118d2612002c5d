// Unit tests for the GitScout core engine

use chrono::{Duration, Utc};
use gitscout::core::{
    build_search_query, is_bounty, merge_filters, paginate,
    filters::{matches_language, post_filter},
    scoring::{match_score, relevance_score},
    sort_issues,
};
use gitscout::models::{
    EnrichedIssue, FilterSet, IssueLabel, RawIssue, RepoOwner, RepositoryDetail, ScoreWeights,
    SortBy, SortOrder, UserProfile,
};

fn create_issue(id: u64, title: &str, labels: &[&str], updated_days_ago: i64) -> RawIssue {
    RawIssue {
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
        created_at: Utc::now() - Duration::days(60),
        updated_at: Utc::now() - Duration::days(updated_days_ago),
        html_url: format!("https://github.com/acme/widget/issues/{}", id),
        repository_url: "https://api.github.com/repos/acme/widget".to_string(),
    }
}

fn create_repo(full_name: &str, language: Option<&str>, stars: u32) -> RepositoryDetail {
    RepositoryDetail {
        full_name: full_name.to_string(),
        language: language.map(str::to_string),
        stars,
        forks: 0,
        open_issues: 0,
        owner: RepoOwner {
            login: full_name.split('/').next().unwrap_or("").to_string(),
            kind: "Organization".to_string(),
        },
        updated_at: None,
        html_url: format!("https://github.com/{}", full_name),
    }
}

fn create_enriched(id: u64, repo_full_name: &str, language: Option<&str>, score: u32) -> EnrichedIssue {
    EnrichedIssue {
        id,
        number: id,
        title: format!("Issue {}", id),
        body: None,
        labels: vec![],
        state: "open".to_string(),
        comments: 0,
        html_url: format!("https://github.com/{}/issues/{}", repo_full_name, id),
        repo_full_name: repo_full_name.to_string(),
        language: language.map(str::to_string),
        stars: 0,
        forks: 0,
        owner_login: repo_full_name.split('/').next().unwrap_or("").to_string(),
        owner_type: "User".to_string(),
        is_bounty: false,
        score,
        match_score: None,
        match_reasons: None,
        opened_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[test]
fn test_empty_filter_set_builds_bare_query() {
    assert_eq!(build_search_query(&FilterSet::default()), "is:issue is:open");
}

#[test]
fn test_label_terms_match_label_count() {
    for n in 0..5 {
        let filters = FilterSet {
            labels: (0..n).map(|i| format!("label-{}", i)).collect(),
            ..FilterSet::default()
        };
        let query = build_search_query(&filters);
        assert_eq!(query.matches("label:\"").count(), n);
    }
}

#[test]
fn test_bounty_classification_is_monotonic() {
    let issues = vec![
        create_issue(1, "Fix crash on resize", &[], 1),
        create_issue(2, "Bounty: fix crash", &[], 1),
        create_issue(3, "Fix crash", &["help wanted"], 1),
    ];

    for issue in issues {
        let before = is_bounty(&issue);
        let mut with_label = issue.clone();
        with_label.labels.push(IssueLabel {
            name: "Bounty".to_string(),
            color: None,
        });
        // adding a bounty label can only flip false -> true
        assert!(is_bounty(&with_label));
        if before {
            assert!(is_bounty(&with_label));
        }
    }
}

#[test]
fn test_relevance_score_bounds() {
    let weights = ScoreWeights::default();
    let cases = [
        (false, 0_u32, 100_i64),
        (true, 50, 0),
        (true, 500, 0),
        (true, 5000, 0),
        (false, 5000, 3),
    ];

    for (bounty, stars, days) in cases {
        let repo = create_repo("acme/widget", None, stars);
        let score = relevance_score(bounty, &repo, Utc::now() - Duration::days(days), &weights);
        assert!(score <= 120, "score {} out of range", score);
    }

    // the ceiling is reachable: bounty + both star tiers + freshest
    let max = relevance_score(
        true,
        &create_repo("acme/widget", None, 2000),
        Utc::now(),
        &weights,
    );
    assert_eq!(max, 120);
}

#[test]
fn test_pagination_properties() {
    // total = 0
    let (slice, meta) = paginate(Vec::<u32>::new(), 1, 10);
    assert!(slice.is_empty());
    assert_eq!(meta.total_pages, 0);

    // total = 25, limit = 10
    let items: Vec<u32> = (0..25).collect();
    let (p1, meta) = paginate(items.clone(), 1, 10);
    assert_eq!((p1.len(), meta.total_pages), (10, 3));
    let (p2, _) = paginate(items.clone(), 2, 10);
    assert_eq!(p2.len(), 10);
    let (p3, _) = paginate(items.clone(), 3, 10);
    assert_eq!(p3.len(), 5);
    let (p4, _) = paginate(items, 4, 10);
    assert!(p4.is_empty());
}

#[test]
fn test_sort_stability_under_both_directions() {
    let mut issues = vec![
        create_enriched(1, "acme/alpha", None, 40),
        create_enriched(2, "acme/beta", None, 40),
        create_enriched(3, "acme/gamma", None, 90),
    ];

    sort_issues(&mut issues, SortBy::Score, SortOrder::Desc);
    let desc_ids: Vec<u64> = issues.iter().map(|i| i.id).collect();
    assert_eq!(desc_ids, vec![3, 1, 2]);

    sort_issues(&mut issues, SortBy::Score, SortOrder::Asc);
    let asc_ids: Vec<u64> = issues.iter().map(|i| i.id).collect();
    // the tied pair keeps its relative order in both directions
    assert_eq!(asc_ids, vec![1, 2, 3]);
}

#[test]
fn test_language_filter_exact_language_path() {
    let issue = create_enriched(1, "acme/widget", Some("Go"), 0);
    assert!(matches_language(&issue, &["go".to_string()]));
}

#[test]
fn test_language_filter_name_substring_path() {
    // "golang" only matches via the repo-name substring heuristic
    let named = create_enriched(1, "acme/widget-golang", Some("Go"), 0);
    assert!(matches_language(&named, &["golang".to_string()]));

    let unnamed = create_enriched(2, "acme/widget", Some("Go"), 0);
    assert!(!matches_language(&unnamed, &["golang".to_string()]));
}

#[test]
fn test_post_filter_star_bounds() {
    let mut popular = create_enriched(1, "acme/widget", None, 0);
    popular.stars = 5000;
    let mut small = create_enriched(2, "acme/gadget", None, 0);
    small.stars = 3;

    let filters = FilterSet {
        min_stars: Some(100),
        ..FilterSet::default()
    };

    let kept = post_filter(vec![popular, small], &filters);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].id, 1);
}

#[test]
fn test_match_score_reason_ordering() {
    let profile = UserProfile {
        user_id: "u1".to_string(),
        languages: vec!["Rust".to_string()],
        topics: vec!["cli".to_string()],
        followed_repos: vec!["acme/widget".to_string()],
        followed_orgs: vec!["acme".to_string()],
        default_labels: vec![],
        min_stars: None,
        updated_at: None,
    };
    let issue = create_issue(1, "Improve CLI startup time", &[], 1);
    let repo = create_repo("acme/widget", Some("Rust"), 10);

    let (score, reasons) = match_score(&issue, &repo, &profile);

    // language (30) + repo (25) + org (25) + one topic (10)
    assert_eq!(score, 90);
    assert_eq!(reasons.len(), 4);
    assert!(reasons[0].contains("languages"));
    assert!(reasons[1].contains("repository you follow"));
    assert!(reasons[2].contains("organization you follow"));
    assert_eq!(reasons[3], "Matches 1 of your topics");
}

#[test]
fn test_merge_filters_never_mutates_defaults() {
    let defaults = FilterSet {
        labels: vec!["good first issue".to_string()],
        min_stars: Some(10),
        bounty_only: true,
        ..FilterSet::default()
    };
    let snapshot = defaults.clone();

    let overrides = FilterSet {
        min_stars: Some(500),
        ..FilterSet::default()
    };

    let merged = merge_filters(&defaults, &overrides);
    assert_eq!(merged.min_stars, Some(500));
    assert_eq!(merged.labels, vec!["good first issue"]);
    assert!(merged.bounty_only);

    assert_eq!(defaults, snapshot);
}
