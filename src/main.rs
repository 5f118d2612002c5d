mod config;
mod core;
mod error;
mod models;
mod routes;
mod services;

use actix_cors::Cors;
use actix_web::{error as actix_error, middleware, web, App, HttpServer};
use std::sync::Arc;
use tracing::{error, info};

use crate::config::Settings;
use crate::core::FeedEngine;
use crate::error::ApiError;
use crate::models::ScoreWeights;
use crate::routes::AppState;
use crate::services::{
    AppwriteClient, AppwriteCollections, CacheManager, GithubClient, PostgresClient,
    SessionVerifier,
};

/// Handle JSON payload errors with the structured envelope
pub fn handle_json_payload_error(
    err: actix_error::JsonPayloadError,
    req: &actix_web::HttpRequest,
) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    ApiError::InvalidParameter(format!("Invalid JSON: {}", err)).into()
}

/// Handle query payload errors with the structured envelope
pub fn handle_query_payload_error(
    err: actix_error::QueryPayloadError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    ApiError::InvalidParameter(format!("Invalid query: {}", err)).into()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Initialize logging
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting GitScout feed service...");

    // Load configuration
    let settings = Settings::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    info!("Configuration loaded successfully");

    // Initialize Appwrite client (preference store)
    let collections = AppwriteCollections {
        user_profiles: settings.collection.user_profiles,
        github_credentials: settings.collection.github_credentials,
        digest_subscriptions: settings.collection.digest_subscriptions,
    };

    let appwrite = Arc::new(AppwriteClient::new(
        settings.appwrite.endpoint,
        settings.appwrite.api_key,
        settings.appwrite.project_id,
        settings.appwrite.database_id,
        collections,
    ));

    info!("Appwrite client initialized");

    // Initialize cache manager
    let cache_ttl = settings.cache.ttl_secs.unwrap_or(300);
    let l1_cache_size = settings.cache.l1_cache_size.unwrap_or(1000);

    let cache = match CacheManager::new(&settings.cache.redis_url, l1_cache_size, cache_ttl).await {
        Ok(c) => {
            info!(
                "Cache manager initialized (L1: {} entries, TTL: {}s)",
                l1_cache_size, cache_ttl
            );
            Arc::new(c)
        }
        Err(e) => {
            error!("Failed to connect to Redis: {}", e);
            return Err(std::io::Error::other("Redis connection required"));
        }
    };

    // Initialize PostgreSQL client (user-issue interaction store)
    let postgres = Arc::new(
        PostgresClient::from_settings(
            &settings.database.url,
            settings.database.max_connections,
            settings.database.min_connections,
        )
        .await
        .unwrap_or_else(|e| {
            error!("Failed to connect to PostgreSQL: {}", e);
            panic!("PostgreSQL connection error: {}", e);
        }),
    );

    info!("PostgreSQL client initialized");

    // Initialize GitHub client
    let github = Arc::new(GithubClient::new(
        settings.github.api_url,
        settings.github.detail_concurrency.unwrap_or(8),
    ));

    // Initialize session verifier
    let sessions = Arc::new(SessionVerifier::new(&settings.session.jwt_secret));

    // Initialize feed engine with configured weights
    let weights = ScoreWeights {
        bounty: settings.scoring.weights.bounty,
        stars_over_100: settings.scoring.weights.stars_over_100,
        stars_over_1000: settings.scoring.weights.stars_over_1000,
        updated_within_day: settings.scoring.weights.updated_within_day,
        updated_within_week: settings.scoring.weights.updated_within_week,
    };

    let engine = FeedEngine::new(weights);

    info!("Feed engine initialized with weights: {:?}", weights);

    // Build application state
    let app_state = AppState {
        github,
        appwrite,
        postgres,
        cache,
        sessions,
        engine,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
