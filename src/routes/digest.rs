use actix_web::{web, HttpRequest, HttpResponse};

use crate::core::merge_filters;
use crate::error::ApiError;
use crate::models::{
    DigestFrequency, DigestSubscribeRequest, DigestSubscription, DigestSubscriptionResponse,
    DigestUpdateRequest, FilterSet,
};
use crate::routes::{issues::load_profile, AppState};

/// Configure digest subscription routes
///
/// Only the subscription records live here; digest delivery itself is an
/// external concern.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/digest/subscribe", web::post().to(subscribe))
        .route("/digest/subscription", web::get().to(get_subscription))
        .route("/digest/subscription", web::put().to(update_subscription));
}

/// Subscribe to the digest
///
/// POST /api/v1/digest/subscribe
///
/// The stored filter set is the profile's defaults merged with whatever the
/// request supplies - a pure merge into a fresh FilterSet, never a mutation
/// of shared defaults.
async fn subscribe(
    state: web::Data<AppState>,
    body: web::Json<DigestSubscribeRequest>,
    http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let user_id = state.sessions.authenticate(&http_req)?;

    let frequency = match body.frequency.as_deref() {
        Some(value) => DigestFrequency::parse(value).ok_or_else(|| {
            ApiError::InvalidParameter("Frequency must be one of: daily, weekly".to_string())
        })?,
        None => DigestFrequency::Weekly,
    };

    let defaults = match load_profile(&state, &user_id).await? {
        Some(profile) => FilterSet {
            labels: profile.default_labels.clone(),
            min_stars: profile.min_stars,
            ..FilterSet::default()
        },
        None => FilterSet::default(),
    };
    let overrides = body.filters.clone().unwrap_or_default();

    let subscription = DigestSubscription {
        user_id: user_id.clone(),
        frequency,
        enabled: true,
        filters: merge_filters(&defaults, &overrides),
        updated_at: Some(chrono::Utc::now()),
    };

    state
        .appwrite
        .upsert_digest_subscription(&subscription)
        .await?;

    tracing::info!("Digest subscription created for user {}", user_id);

    Ok(HttpResponse::Ok().json(DigestSubscriptionResponse { subscription }))
}

/// Fetch the caller's digest subscription
///
/// GET /api/v1/digest/subscription
async fn get_subscription(
    state: web::Data<AppState>,
    http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let user_id = state.sessions.authenticate(&http_req)?;

    let subscription = state.appwrite.get_digest_subscription(&user_id).await?;

    Ok(HttpResponse::Ok().json(DigestSubscriptionResponse { subscription }))
}

/// Update the caller's digest subscription
///
/// PUT /api/v1/digest/subscription - absent fields keep their stored values
async fn update_subscription(
    state: web::Data<AppState>,
    body: web::Json<DigestUpdateRequest>,
    http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let user_id = state.sessions.authenticate(&http_req)?;

    let mut subscription = state.appwrite.get_digest_subscription(&user_id).await?;

    if let Some(value) = body.frequency.as_deref() {
        subscription.frequency = DigestFrequency::parse(value).ok_or_else(|| {
            ApiError::InvalidParameter("Frequency must be one of: daily, weekly".to_string())
        })?;
    }
    if let Some(enabled) = body.enabled {
        subscription.enabled = enabled;
    }
    if let Some(filters) = &body.filters {
        subscription.filters = filters.clone();
    }
    subscription.updated_at = Some(chrono::Utc::now());

    state
        .appwrite
        .upsert_digest_subscription(&subscription)
        .await?;

    Ok(HttpResponse::Ok().json(DigestSubscriptionResponse { subscription }))
}
