// Route exports
pub mod digest;
pub mod health;
pub mod issues;
pub mod profile;
pub mod user_issues;

use actix_web::web;
use std::sync::Arc;

use crate::core::FeedEngine;
use crate::services::{AppwriteClient, CacheManager, GithubClient, PostgresClient, SessionVerifier};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub github: Arc<GithubClient>,
    pub appwrite: Arc<AppwriteClient>,
    pub postgres: Arc<PostgresClient>,
    pub cache: Arc<CacheManager>,
    pub sessions: Arc<SessionVerifier>,
    pub engine: FeedEngine,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(health::configure)
            .configure(issues::configure)
            .configure(user_issues::configure)
            .configure(profile::configure)
            .configure(digest::configure),
    );
}
