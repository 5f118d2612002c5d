use serde::{Deserialize, Serialize};

use crate::models::domain::{
    DigestSubscription, EnrichedIssue, FilterSet, UserIssueRecord, UserProfile,
};

/// Pagination metadata derived per request, never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
}

/// Response for the issues feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedResponse {
    pub issues: Vec<EnrichedIssue>,
    pub pagination: Pagination,
    /// Echo of the normalized filters the feed was built with
    pub filters: FilterSet,
}

/// Personalization block for the single-issue lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Personalization {
    #[serde(rename = "matchScore")]
    pub match_score: u32,
    #[serde(rename = "matchReasons")]
    pub match_reasons: Vec<String>,
    #[serde(rename = "hasProfile")]
    pub has_profile: bool,
}

/// Response for the single-issue lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueDetailResponse {
    pub issue: EnrichedIssue,
    pub personalization: Personalization,
    #[serde(rename = "userStatus", skip_serializing_if = "Option::is_none")]
    pub user_status: Option<UserIssueRecord>,
}

/// Response for stored-issue listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserIssuesResponse {
    pub issues: Vec<UserIssueRecord>,
    pub pagination: Pagination,
}

/// Response for save/status mutations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusResponse {
    pub success: bool,
    pub issue: UserIssueRecord,
}

/// Response wrapper for profile reads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub profile: UserProfile,
}

/// Response wrapper for digest subscription reads and writes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestSubscriptionResponse {
    pub subscription: DigestSubscription,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error envelope returned on every failure path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
    /// Per-field validation details, when the failure is a validation error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Corrective usage example, e.g. for a missing `repo` parameter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: &str, message: String, status_code: u16) -> Self {
        Self {
            error: error.to_string(),
            message,
            status_code,
            details: None,
            example: None,
        }
    }
}
