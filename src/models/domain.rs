use serde::{Deserialize, Serialize};

/// Label attached to an issue, as returned by the GitHub API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueLabel {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// Account that an issue is assigned to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueAssignee {
    pub login: String,
}

/// Raw issue as returned by the GitHub search/issues API
///
/// Deserialized defensively: optional and missing fields default rather than
/// failing the whole search page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawIssue {
    pub id: u64,
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub labels: Vec<IssueLabel>,
    pub state: String,
    #[serde(default)]
    pub comments: u32,
    #[serde(default)]
    pub assignee: Option<IssueAssignee>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub html_url: String,
    #[serde(default)]
    pub repository_url: String,
}

impl RawIssue {
    /// Label names, as plain strings
    pub fn label_names(&self) -> Vec<String> {
        self.labels.iter().map(|l| l.name.clone()).collect()
    }
}

/// Owner of a repository
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoOwner {
    pub login: String,
    #[serde(rename = "type", default = "default_owner_type")]
    pub kind: String,
}

fn default_owner_type() -> String {
    "User".to_string()
}

/// Repository metadata as returned by the GitHub repos API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryDetail {
    pub full_name: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(rename = "stargazers_count", default)]
    pub stars: u32,
    #[serde(rename = "forks_count", default)]
    pub forks: u32,
    #[serde(rename = "open_issues_count", default)]
    pub open_issues: u32,
    pub owner: RepoOwner,
    #[serde(default)]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub html_url: String,
}

/// Issue joined with its repository metadata plus derived fields
///
/// Built fresh per request and never persisted; scores are recomputed on
/// every read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedIssue {
    pub id: u64,
    pub number: u64,
    pub title: String,
    pub body: Option<String>,
    pub labels: Vec<String>,
    pub state: String,
    pub comments: u32,
    #[serde(rename = "htmlUrl")]
    pub html_url: String,
    #[serde(rename = "repoFullName")]
    pub repo_full_name: String,
    pub language: Option<String>,
    pub stars: u32,
    pub forks: u32,
    #[serde(rename = "ownerLogin")]
    pub owner_login: String,
    #[serde(rename = "ownerType")]
    pub owner_type: String,
    #[serde(rename = "isBounty")]
    pub is_bounty: bool,
    pub score: u32,
    #[serde(rename = "matchScore", skip_serializing_if = "Option::is_none")]
    pub match_score: Option<u32>,
    #[serde(rename = "matchReasons", skip_serializing_if = "Option::is_none")]
    pub match_reasons: Option<Vec<String>>,
    #[serde(rename = "openedAt")]
    pub opened_at: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Stored user preferences used for personalization
///
/// Values are stored case-sensitively; all matching against them is done
/// case-insensitively by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(rename = "followedRepos", default)]
    pub followed_repos: Vec<String>,
    #[serde(rename = "followedOrgs", default)]
    pub followed_orgs: Vec<String>,
    #[serde(rename = "defaultLabels", default)]
    pub default_labels: Vec<String>,
    #[serde(rename = "minStars", default)]
    pub min_stars: Option<u32>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Normalized filter set derived per request
///
/// Absent fields impose no constraint: an empty list or `None` means the
/// filter is open, not empty-match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSet {
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(rename = "minStars", default)]
    pub min_stars: Option<u32>,
    #[serde(rename = "maxStars", default)]
    pub max_stars: Option<u32>,
    #[serde(default)]
    pub orgs: Vec<String>,
    #[serde(default)]
    pub repos: Vec<String>,
    #[serde(rename = "bountyOnly", default)]
    pub bounty_only: bool,
    #[serde(rename = "followedOnly", default)]
    pub followed_only: bool,
}

/// User interaction state for an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_issue_status", rename_all = "lowercase")]
pub enum IssueStatus {
    Saved,
    Started,
    Done,
}

impl IssueStatus {
    /// Parse from the wire representation; anything outside the closed set
    /// is rejected.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "saved" => Some(IssueStatus::Saved),
            "started" => Some(IssueStatus::Started),
            "done" => Some(IssueStatus::Done),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueStatus::Saved => "saved",
            IssueStatus::Started => "started",
            IssueStatus::Done => "done",
        }
    }
}

/// Stored snapshot of an issue a user has saved, started or completed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserIssueRecord {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "issueId")]
    pub issue_id: i64,
    #[serde(rename = "repoFullName")]
    pub repo_full_name: String,
    pub title: String,
    #[serde(rename = "htmlUrl")]
    pub html_url: String,
    #[serde(rename = "isBounty")]
    pub is_bounty: bool,
    pub status: IssueStatus,
    #[serde(rename = "savedAt")]
    pub saved_at: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// How often a digest subscription fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestFrequency {
    Daily,
    Weekly,
}

impl DigestFrequency {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "daily" => Some(DigestFrequency::Daily),
            "weekly" => Some(DigestFrequency::Weekly),
            _ => None,
        }
    }
}

/// Digest subscription with the filters resolved at subscribe time
///
/// Delivery itself is handled outside this service; only the subscription
/// record lives here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestSubscription {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub frequency: DigestFrequency,
    pub enabled: bool,
    pub filters: FilterSet,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Relevance score bonuses
#[derive(Debug, Clone, Copy)]
pub struct ScoreWeights {
    pub bounty: u32,
    pub stars_over_100: u32,
    pub stars_over_1000: u32,
    pub updated_within_day: u32,
    pub updated_within_week: u32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            bounty: 50,
            stars_over_100: 20,
            stars_over_1000: 30,
            updated_within_day: 20,
            updated_within_week: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_status_parse_closed_set() {
        assert_eq!(IssueStatus::parse("saved"), Some(IssueStatus::Saved));
        assert_eq!(IssueStatus::parse("started"), Some(IssueStatus::Started));
        assert_eq!(IssueStatus::parse("done"), Some(IssueStatus::Done));
        assert_eq!(IssueStatus::parse("archived"), None);
        assert_eq!(IssueStatus::parse("Saved"), None);
    }

    #[test]
    fn test_raw_issue_parses_github_shape() {
        let json = serde_json::json!({
            "id": 123,
            "number": 42,
            "title": "Fix the parser",
            "body": null,
            "labels": [{"name": "bug", "color": "d73a4a"}],
            "state": "open",
            "comments": 3,
            "assignee": null,
            "created_at": "2024-05-01T12:00:00Z",
            "updated_at": "2024-05-02T12:00:00Z",
            "html_url": "https://github.com/acme/widget/issues/42",
            "repository_url": "https://api.github.com/repos/acme/widget"
        });

        let issue: RawIssue = serde_json::from_value(json).unwrap();
        assert_eq!(issue.number, 42);
        assert_eq!(issue.label_names(), vec!["bug"]);
        assert!(issue.body.is_none());
    }

    #[test]
    fn test_repository_detail_defaults_missing_counts() {
        let json = serde_json::json!({
            "full_name": "acme/widget",
            "language": null,
            "owner": {"login": "acme", "type": "Organization"}
        });

        let repo: RepositoryDetail = serde_json::from_value(json).unwrap();
        assert_eq!(repo.stars, 0);
        assert_eq!(repo.owner.kind, "Organization");
    }
}
