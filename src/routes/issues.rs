use std::collections::HashMap;

use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::core::{bounty::is_bounty, build_search_query, paginate};
use crate::error::ApiError;
use crate::models::{
    FeedQuery, FeedResponse, IssueDetailResponse, IssueLookupQuery, IssueStatus, Personalization,
    RawIssue, RepositoryDetail, SaveIssueRequest, UpdateStatusRequest, UpdateStatusResponse,
    UserIssueRecord, UserProfile,
};
use crate::routes::AppState;
use crate::services::{AppwriteError, CacheKey, GithubCredential};

/// Upstream search window: post-filtering changes result counts, so one
/// maximal page is fetched and pagination happens locally over the
/// filtered, sorted set.
const UPSTREAM_WINDOW: u32 = 100;

/// Configure issue routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/issues", web::get().to(get_feed))
        .route("/issues/{number}", web::get().to(get_issue))
        .route("/issues/{number}/save", web::post().to(save_issue))
        .route("/issues/{number}/status", web::put().to(update_status));
}

/// Load the caller's profile, if one is set up, through the cache
pub(crate) async fn load_profile(
    state: &AppState,
    user_id: &str,
) -> Result<Option<UserProfile>, ApiError> {
    let cache_key = CacheKey::profile(user_id);
    if let Ok(profile) = state.cache.get::<UserProfile>(&cache_key).await {
        return Ok(Some(profile));
    }

    match state.appwrite.get_profile(user_id).await {
        Ok(profile) => {
            if let Err(e) = state.cache.set(&cache_key, &profile).await {
                tracing::warn!("Failed to cache profile for {}: {}", user_id, e);
            }
            Ok(Some(profile))
        }
        Err(AppwriteError::NotFound(_)) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Fetch the caller's linked GitHub token; absence is a 400 with a
/// remediation hint, detected before any GitHub call is made
pub(crate) async fn require_credential(
    state: &AppState,
    user_id: &str,
) -> Result<GithubCredential, ApiError> {
    match state.appwrite.get_credential(user_id).await {
        Ok(credential) => Ok(credential),
        Err(AppwriteError::NotFound(_)) => Err(ApiError::MissingCredential),
        Err(e) => Err(e.into()),
    }
}

/// Resolve repository details for a set of referenced URLs, cache-first
///
/// Cache hits skip the network; misses are fetched in one deduplicated,
/// bounded fan-out and written back with the configured TTL.
async fn resolve_repository_details(
    state: &AppState,
    token: &str,
    repo_urls: Vec<String>,
) -> HashMap<String, RepositoryDetail> {
    let mut details: HashMap<String, RepositoryDetail> = HashMap::new();
    let mut misses: Vec<String> = Vec::new();

    for url in repo_urls {
        if details.contains_key(&url) || misses.contains(&url) {
            continue;
        }
        match state
            .cache
            .get::<RepositoryDetail>(&CacheKey::repository(&url))
            .await
        {
            Ok(detail) => {
                details.insert(url, detail);
            }
            Err(_) => misses.push(url),
        }
    }

    if misses.is_empty() {
        return details;
    }

    let fetched = state
        .github
        .fetch_repository_details(token, misses)
        .await;

    for (url, detail) in fetched {
        if let Err(e) = state
            .cache
            .set(&CacheKey::repository(&url), &detail)
            .await
        {
            tracing::warn!("Failed to cache repository {}: {}", url, e);
        }
        details.insert(url, detail);
    }

    details
}

/// Issues feed endpoint
///
/// GET /api/v1/issues
///
/// Fetches one upstream search window, joins repository details, runs the
/// post-filter/scoring pipeline and paginates the result locally.
async fn get_feed(
    state: web::Data<AppState>,
    query: web::Query<FeedQuery>,
    http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let user_id = state.sessions.authenticate(&http_req)?;
    query.validate()?;

    let credential = require_credential(&state, &user_id).await?;
    let profile = load_profile(&state, &user_id).await?;

    let filters = query.to_filter_set(profile.as_ref());
    let search_query = build_search_query(&filters);

    tracing::info!("Feed for user {}: {}", user_id, search_query);

    let results = state
        .github
        .search_issues(&credential.access_token, &search_query, 1, UPSTREAM_WINDOW)
        .await?;

    let repo_urls: Vec<String> = results
        .issues
        .iter()
        .map(|issue| issue.repository_url.clone())
        .collect();
    let details = resolve_repository_details(&state, &credential.access_token, repo_urls).await;

    let pairs: Vec<(RawIssue, RepositoryDetail)> = results
        .issues
        .into_iter()
        .filter_map(|issue| match details.get(&issue.repository_url) {
            Some(repo) => Some((issue, repo.clone())),
            None => {
                tracing::warn!(
                    "Dropping issue #{}: repository details unavailable",
                    issue.number
                );
                None
            }
        })
        .collect();

    let feed = state.engine.assemble(
        pairs,
        &filters,
        profile.as_ref(),
        query.sort_by,
        query.sort_order,
    );

    let (issues, pagination) = paginate(feed, query.page, query.limit);

    tracing::info!(
        "Returning {} of {} feed issues for user {}",
        issues.len(),
        pagination.total,
        user_id
    );

    Ok(HttpResponse::Ok().json(FeedResponse {
        issues,
        pagination,
        filters,
    }))
}

/// Single-issue lookup
///
/// GET /api/v1/issues/{number}?repo=owner/name
///
/// GitHub has no global issue lookup by number alone, so `repo` is
/// mandatory; its absence gets a corrective example.
async fn get_issue(
    state: web::Data<AppState>,
    path: web::Path<u64>,
    query: web::Query<IssueLookupQuery>,
    http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let user_id = state.sessions.authenticate(&http_req)?;
    let number = path.into_inner();

    let repo = query
        .repo
        .as_deref()
        .filter(|r| !r.is_empty())
        .ok_or_else(|| ApiError::MissingContext {
            message: "The repo query parameter is required to look up an issue".to_string(),
            example: format!("/api/v1/issues/{}?repo=owner/name", number),
        })?
        .to_string();

    let credential = require_credential(&state, &user_id).await?;
    let profile = load_profile(&state, &user_id).await?;

    let issue = state
        .github
        .get_issue(&credential.access_token, &repo, number)
        .await?;
    let repo_detail = state
        .github
        .get_repository(&credential.access_token, &repo)
        .await?;

    let issue_id = issue.id as i64;
    let enriched = state.engine.enrich(issue, &repo_detail, profile.as_ref());

    let personalization = Personalization {
        match_score: enriched.match_score.unwrap_or(0),
        match_reasons: enriched.match_reasons.clone().unwrap_or_default(),
        has_profile: profile.is_some(),
    };

    let user_status = state.postgres.get_user_issue(&user_id, issue_id).await?;

    Ok(HttpResponse::Ok().json(IssueDetailResponse {
        issue: enriched,
        personalization,
        user_status,
    }))
}

/// Save an issue to the caller's list
///
/// POST /api/v1/issues/{number}/save
async fn save_issue(
    state: web::Data<AppState>,
    path: web::Path<u64>,
    body: web::Json<SaveIssueRequest>,
    http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let user_id = state.sessions.authenticate(&http_req)?;
    body.validate()?;

    upsert_with_status(
        &state,
        &user_id,
        path.into_inner(),
        &body.repo,
        IssueStatus::Saved,
    )
    .await
}

/// Update the caller's status for an issue
///
/// PUT /api/v1/issues/{number}/status
async fn update_status(
    state: web::Data<AppState>,
    path: web::Path<u64>,
    body: web::Json<UpdateStatusRequest>,
    http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let user_id = state.sessions.authenticate(&http_req)?;
    body.validate()?;

    let status = IssueStatus::parse(&body.status).ok_or_else(|| {
        ApiError::InvalidParameter("Status must be one of: saved, started, done".to_string())
    })?;

    upsert_with_status(&state, &user_id, path.into_inner(), &body.repo, status).await
}

/// Fetch the issue, classify it and upsert the interaction snapshot
async fn upsert_with_status(
    state: &AppState,
    user_id: &str,
    number: u64,
    repo: &str,
    status: IssueStatus,
) -> Result<HttpResponse, ApiError> {
    let credential = require_credential(state, user_id).await?;

    let issue = state
        .github
        .get_issue(&credential.access_token, repo, number)
        .await?;

    let now = chrono::Utc::now();
    let record = UserIssueRecord {
        user_id: user_id.to_string(),
        issue_id: issue.id as i64,
        repo_full_name: repo.to_string(),
        title: issue.title.clone(),
        html_url: issue.html_url.clone(),
        is_bounty: is_bounty(&issue),
        status,
        saved_at: now,
        updated_at: now,
    };

    state.postgres.upsert_user_issue(&record).await?;

    Ok(HttpResponse::Ok().json(UpdateStatusResponse {
        success: true,
        issue: record,
    }))
}
