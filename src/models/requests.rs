use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::domain::{FilterSet, UserProfile};

/// Sort key for the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    #[default]
    Score,
    Stars,
    OpenedAt,
    UpdatedAt,
}

/// Sort direction for the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Query parameters for the issues feed
///
/// Plural filters arrive as comma-separated lists.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_star_bounds"))]
pub struct FeedQuery {
    #[serde(default)]
    pub languages: Option<String>,
    #[serde(default)]
    pub labels: Option<String>,
    #[serde(rename = "minStars", default)]
    pub min_stars: Option<u32>,
    #[serde(rename = "maxStars", default)]
    pub max_stars: Option<u32>,
    #[serde(rename = "bountyOnly", default)]
    pub bounty_only: Option<bool>,
    #[serde(rename = "followedOnly", default)]
    pub followed_only: Option<bool>,
    #[serde(default)]
    pub orgs: Option<String>,
    #[serde(default)]
    pub repos: Option<String>,
    #[serde(default = "default_page")]
    #[validate(range(min = 1))]
    pub page: u32,
    #[serde(default = "default_feed_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: u32,
    #[serde(rename = "sortBy", default)]
    pub sort_by: SortBy,
    #[serde(rename = "sortOrder", default)]
    pub sort_order: SortOrder,
}

fn default_page() -> u32 {
    1
}

fn default_feed_limit() -> u32 {
    20
}

fn validate_star_bounds(query: &FeedQuery) -> Result<(), ValidationError> {
    if let (Some(min), Some(max)) = (query.min_stars, query.max_stars) {
        if min > max {
            return Err(ValidationError::new("min_stars_exceeds_max_stars"));
        }
    }
    Ok(())
}

/// Split a comma-separated query value into trimmed, non-empty entries
pub fn parse_list(value: &Option<String>) -> Vec<String> {
    value
        .as_deref()
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

impl FeedQuery {
    /// Normalize into a FilterSet, folding in the profile's stored defaults
    /// for any field the request leaves unset.
    pub fn to_filter_set(&self, profile: Option<&UserProfile>) -> FilterSet {
        let request = FilterSet {
            languages: parse_list(&self.languages),
            labels: parse_list(&self.labels),
            min_stars: self.min_stars,
            max_stars: self.max_stars,
            orgs: parse_list(&self.orgs),
            repos: parse_list(&self.repos),
            bounty_only: self.bounty_only.unwrap_or(false),
            followed_only: self.followed_only.unwrap_or(false),
        };

        match profile {
            Some(p) => {
                let defaults = FilterSet {
                    labels: p.default_labels.clone(),
                    min_stars: p.min_stars,
                    ..FilterSet::default()
                };
                crate::core::filters::merge_filters(&defaults, &request)
            }
            None => request,
        }
    }
}

/// Query parameters for the single-issue lookup
#[derive(Debug, Clone, Deserialize)]
pub struct IssueLookupQuery {
    #[serde(default)]
    pub repo: Option<String>,
}

/// Body for POST /issues/{number}/save
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SaveIssueRequest {
    #[validate(length(min = 1))]
    pub repo: String,
}

/// Body for PUT /issues/{number}/status
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    #[validate(length(min = 1))]
    pub repo: String,
    #[validate(length(min = 1))]
    pub status: String,
}

/// Query parameters for stored-issue listings
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StatusListQuery {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default = "default_page")]
    #[validate(range(min = 1))]
    pub page: u32,
    #[serde(default = "default_status_limit")]
    #[validate(range(min = 1, max = 50))]
    pub limit: u32,
}

fn default_status_limit() -> u32 {
    10
}

/// Body for POST /profile/setup - full profile replacement
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProfileSetupRequest {
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
}

/// Body for PUT /profile - partial update, absent fields keep stored values
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileUpdateRequest {
    #[serde(default)]
    pub languages: Option<Vec<String>>,
    #[serde(default)]
    pub topics: Option<Vec<String>>,
    #[serde(rename = "followedRepos", default)]
    pub followed_repos: Option<Vec<String>>,
    #[serde(rename = "followedOrgs", default)]
    pub followed_orgs: Option<Vec<String>>,
    #[serde(rename = "defaultLabels", default)]
    pub default_labels: Option<Vec<String>>,
    #[serde(rename = "minStars", default)]
    pub min_stars: Option<u32>,
}

/// Body for POST /digest/subscribe
#[derive(Debug, Clone, Deserialize)]
pub struct DigestSubscribeRequest {
    #[serde(default)]
    pub frequency: Option<String>,
    #[serde(default)]
    pub filters: Option<FilterSet>,
}

/// Body for PUT /digest/subscription
#[derive(Debug, Clone, Deserialize)]
pub struct DigestUpdateRequest {
    #[serde(default)]
    pub frequency: Option<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub filters: Option<FilterSet>,
}
