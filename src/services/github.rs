use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::models::{RawIssue, RepositoryDetail};

/// Errors that can occur when talking to the GitHub API
#[derive(Debug, Error)]
pub enum GithubError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("GitHub API returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// One page of issue search results, with the upstream total
#[derive(Debug, Clone)]
pub struct SearchResults {
    pub total_count: u64,
    pub issues: Vec<RawIssue>,
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    #[serde(default)]
    total_count: u64,
    #[serde(default)]
    items: Vec<serde_json::Value>,
}

/// GitHub API client
///
/// The engine's only network dependency: issue search, single-issue
/// lookups and repository detail fetches. Requests authenticate with the
/// caller's stored token; no retries are attempted here.
pub struct GithubClient {
    base_url: String,
    client: Client,
    detail_concurrency: usize,
}

impl GithubClient {
    /// Create a new GitHub client
    pub fn new(base_url: String, detail_concurrency: usize) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("gitscout/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            client,
            detail_concurrency: detail_concurrency.max(1),
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn get(&self, url: &str, token: &str) -> Result<reqwest::Response, GithubError> {
        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Bearer {}", token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send()
            .await?;
        Ok(response)
    }

    async fn upstream_error(response: reqwest::Response) -> GithubError {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read body".to_string());
        GithubError::Upstream { status, body }
    }

    /// Run an issue search query against `/search/issues`
    ///
    /// Malformed items are skipped with a warning rather than failing the
    /// whole page; the upstream caps and paginates independently of us.
    pub async fn search_issues(
        &self,
        token: &str,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<SearchResults, GithubError> {
        let url = format!(
            "{}?q={}&page={}&per_page={}",
            self.api_url("/search/issues"),
            urlencoding::encode(query),
            page,
            per_page
        );

        tracing::debug!("Searching issues: {}", query);

        let response = self.get(&url, token).await?;
        if !response.status().is_success() {
            return Err(Self::upstream_error(response).await);
        }

        let envelope: SearchEnvelope = response
            .json()
            .await
            .map_err(|e| GithubError::InvalidResponse(format!("Failed to parse search page: {}", e)))?;

        let issues: Vec<RawIssue> = envelope
            .items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<RawIssue>(item) {
                Ok(issue) => Some(issue),
                Err(e) => {
                    tracing::warn!("Skipping malformed search item: {}", e);
                    None
                }
            })
            .collect();

        tracing::debug!(
            "Search returned {} parsable issues (upstream total: {})",
            issues.len(),
            envelope.total_count
        );

        Ok(SearchResults {
            total_count: envelope.total_count,
            issues,
        })
    }

    /// Fetch a single issue by repository full name and issue number
    ///
    /// GitHub has no global issue lookup by id alone, so the repository
    /// context is required.
    pub async fn get_issue(
        &self,
        token: &str,
        repo_full_name: &str,
        number: u64,
    ) -> Result<RawIssue, GithubError> {
        let url = self.api_url(&format!("/repos/{}/issues/{}", repo_full_name, number));

        let response = self.get(&url, token).await?;
        if response.status().as_u16() == 404 {
            return Err(GithubError::NotFound(format!(
                "issue #{} in {}",
                number, repo_full_name
            )));
        }
        if !response.status().is_success() {
            return Err(Self::upstream_error(response).await);
        }

        let value: serde_json::Value = response.json().await?;
        serde_json::from_value(value)
            .map_err(|e| GithubError::InvalidResponse(format!("Failed to parse issue: {}", e)))
    }

    /// Fetch repository metadata by full name (`owner/name`)
    pub async fn get_repository(
        &self,
        token: &str,
        full_name: &str,
    ) -> Result<RepositoryDetail, GithubError> {
        let url = self.api_url(&format!("/repos/{}", full_name));
        self.get_repository_at(token, &url).await
    }

    /// Fetch repository metadata from an absolute API URL, as referenced by
    /// search results
    pub async fn get_repository_at(
        &self,
        token: &str,
        url: &str,
    ) -> Result<RepositoryDetail, GithubError> {
        let response = self.get(url, token).await?;
        if response.status().as_u16() == 404 {
            return Err(GithubError::NotFound(format!("repository at {}", url)));
        }
        if !response.status().is_success() {
            return Err(Self::upstream_error(response).await);
        }

        let value: serde_json::Value = response.json().await?;
        serde_json::from_value(value)
            .map_err(|e| GithubError::InvalidResponse(format!("Failed to parse repository: {}", e)))
    }

    /// Fetch details for every distinct repository URL referenced by a
    /// result set
    ///
    /// URLs are deduplicated first - a repository is never fetched twice in
    /// one request - then fanned out with bounded concurrency and joined
    /// back into a map keyed by URL. A repository whose fetch fails is
    /// dropped from the map with a warning; the callers drop its issues.
    pub async fn fetch_repository_details(
        self: &Arc<Self>,
        token: &str,
        repo_urls: impl IntoIterator<Item = String>,
    ) -> HashMap<String, RepositoryDetail> {
        let distinct: HashSet<String> = repo_urls.into_iter().collect();
        let semaphore = Arc::new(Semaphore::new(self.detail_concurrency));
        let mut tasks = JoinSet::new();

        for url in distinct {
            let client = Arc::clone(self);
            let semaphore = Arc::clone(&semaphore);
            let token = token.to_string();
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let result = client.get_repository_at(&token, &url).await;
                (url, result)
            });
        }

        let mut details = HashMap::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((url, Ok(detail))) => {
                    details.insert(url, detail);
                }
                Ok((url, Err(e))) => {
                    tracing::warn!("Failed to fetch repository details for {}: {}", url, e);
                }
                Err(e) => {
                    tracing::warn!("Repository detail task panicked: {}", e);
                }
            }
        }

        details
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = GithubClient::new("https://api.github.com".to_string(), 8);
        assert_eq!(client.base_url, "https://api.github.com");
        assert_eq!(client.detail_concurrency, 8);
    }

    #[test]
    fn test_detail_concurrency_floor() {
        let client = GithubClient::new("https://api.github.com".to_string(), 0);
        assert_eq!(client.detail_concurrency, 1);
    }

    #[test]
    fn test_api_url_joins_cleanly() {
        let client = GithubClient::new("https://api.github.com/".to_string(), 4);
        assert_eq!(
            client.api_url("/repos/acme/widget"),
            "https://api.github.com/repos/acme/widget"
        );
    }
}
