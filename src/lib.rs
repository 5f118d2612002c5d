//! GitScout - personalized GitHub issues feed
//!
//! Aggregates open issues from the GitHub search API, filters and re-ranks
//! them against stored user preferences, and exposes a paginated feed with
//! bounty detection.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{build_search_query, is_bounty, merge_filters, paginate, FeedEngine};
pub use crate::models::{
    EnrichedIssue, FilterSet, RawIssue, RepositoryDetail, ScoreWeights, UserProfile,
};
