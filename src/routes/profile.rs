use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::error::ApiError;
use crate::models::{ProfileResponse, ProfileSetupRequest, ProfileUpdateRequest, UserProfile};
use crate::routes::AppState;
use crate::services::CacheKey;

/// Configure profile routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/profile", web::get().to(get_profile))
        .route("/profile", web::put().to(update_profile))
        .route("/profile/setup", web::post().to(setup_profile));
}

/// Fetch the caller's preference profile
///
/// GET /api/v1/profile
async fn get_profile(
    state: web::Data<AppState>,
    http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let user_id = state.sessions.authenticate(&http_req)?;

    let profile = state.appwrite.get_profile(&user_id).await?;

    Ok(HttpResponse::Ok().json(ProfileResponse { profile }))
}

/// Create or replace the caller's preference profile
///
/// POST /api/v1/profile/setup
async fn setup_profile(
    state: web::Data<AppState>,
    body: web::Json<ProfileSetupRequest>,
    http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let user_id = state.sessions.authenticate(&http_req)?;
    body.validate()?;

    let profile = UserProfile {
        user_id: user_id.clone(),
        languages: body.languages.clone(),
        topics: body.topics.clone(),
        followed_repos: body.followed_repos.clone(),
        followed_orgs: body.followed_orgs.clone(),
        default_labels: body.default_labels.clone(),
        min_stars: body.min_stars,
        updated_at: Some(chrono::Utc::now()),
    };

    state.appwrite.upsert_profile(&profile).await?;
    invalidate_profile_cache(&state, &user_id).await;

    tracing::info!("Profile set up for user {}", user_id);

    Ok(HttpResponse::Ok().json(ProfileResponse { profile }))
}

/// Partially update the caller's preference profile
///
/// PUT /api/v1/profile - absent fields keep their stored values
async fn update_profile(
    state: web::Data<AppState>,
    body: web::Json<ProfileUpdateRequest>,
    http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let user_id = state.sessions.authenticate(&http_req)?;

    let mut profile = state.appwrite.get_profile(&user_id).await?;

    if let Some(languages) = &body.languages {
        profile.languages = languages.clone();
    }
    if let Some(topics) = &body.topics {
        profile.topics = topics.clone();
    }
    if let Some(followed_repos) = &body.followed_repos {
        profile.followed_repos = followed_repos.clone();
    }
    if let Some(followed_orgs) = &body.followed_orgs {
        profile.followed_orgs = followed_orgs.clone();
    }
    if let Some(default_labels) = &body.default_labels {
        profile.default_labels = default_labels.clone();
    }
    if let Some(min_stars) = body.min_stars {
        profile.min_stars = Some(min_stars);
    }
    profile.updated_at = Some(chrono::Utc::now());

    state.appwrite.upsert_profile(&profile).await?;
    invalidate_profile_cache(&state, &user_id).await;

    Ok(HttpResponse::Ok().json(ProfileResponse { profile }))
}

async fn invalidate_profile_cache(state: &AppState, user_id: &str) {
    if let Err(e) = state.cache.delete(&CacheKey::profile(user_id)).await {
        tracing::warn!("Failed to invalidate profile cache for {}: {}", user_id, e);
    }
}
