use crate::models::FilterSet;

/// Free-text disjunction appended when the bounty-only flag is set
const BOUNTY_DISJUNCTION: &str =
    r#"label:bounty OR label:reward OR label:paid OR "bounty" OR "reward" OR "paid""#;

/// Translate a filter set into the GitHub issue search grammar
///
/// Always anchors on `is:issue is:open`. Label, org and repo terms are
/// conjunctive: an issue must match every listed term. Callers needing
/// "any of these orgs" semantics must issue separate requests.
///
/// Language is deliberately absent here - the search grammar cannot filter
/// by repository language, so it is applied in the post-filter stage.
pub fn build_search_query(filters: &FilterSet) -> String {
    let mut terms = vec!["is:issue".to_string(), "is:open".to_string()];

    if filters.bounty_only {
        terms.push(BOUNTY_DISJUNCTION.to_string());
    }

    for label in &filters.labels {
        terms.push(format!("label:\"{}\"", label));
    }

    for org in &filters.orgs {
        terms.push(format!("org:\"{}\"", org));
    }

    for repo in &filters.repos {
        terms.push(format!("repo:\"{}\"", repo));
    }

    terms.join(" ")
}
