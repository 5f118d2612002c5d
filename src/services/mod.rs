// Service exports
pub mod appwrite;
pub mod cache;
pub mod github;
pub mod postgres;
pub mod session;

pub use appwrite::{AppwriteClient, AppwriteCollections, AppwriteError, GithubCredential};
pub use cache::{CacheError, CacheKey, CacheManager};
pub use github::{GithubClient, GithubError, SearchResults};
pub use postgres::{PostgresClient, PostgresError};
pub use session::{SessionError, SessionVerifier};
