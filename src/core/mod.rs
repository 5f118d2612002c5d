// Core engine exports
pub mod bounty;
pub mod feed;
pub mod filters;
pub mod pagination;
pub mod query;
pub mod scoring;

pub use bounty::is_bounty;
pub use feed::{sort_issues, FeedEngine};
pub use filters::{merge_filters, post_filter};
pub use pagination::paginate;
pub use query::build_search_query;
pub use scoring::{match_score, relevance_score};
