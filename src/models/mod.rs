// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    DigestFrequency, DigestSubscription, EnrichedIssue, FilterSet, IssueAssignee, IssueLabel,
    IssueStatus, RawIssue, RepoOwner, RepositoryDetail, ScoreWeights, UserIssueRecord, UserProfile,
};
pub use requests::{
    DigestSubscribeRequest, DigestUpdateRequest, FeedQuery, IssueLookupQuery, ProfileSetupRequest,
    ProfileUpdateRequest, SaveIssueRequest, SortBy, SortOrder, StatusListQuery,
    UpdateStatusRequest,
};
pub use responses::{
    DigestSubscriptionResponse, ErrorResponse, FeedResponse, HealthResponse, IssueDetailResponse,
    Pagination, Personalization, ProfileResponse, UpdateStatusResponse, UserIssuesResponse,
};
