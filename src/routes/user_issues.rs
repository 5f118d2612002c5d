use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::error::ApiError;
use crate::models::{IssueStatus, Pagination, StatusListQuery, UserIssuesResponse};
use crate::routes::AppState;

/// Configure stored-issue listing routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/user/issues", web::get().to(list_issues))
        .route("/user/issues/saved", web::get().to(list_saved))
        .route("/user/issues/done", web::get().to(list_done));
}

/// List the caller's stored issues, optionally filtered by status
///
/// GET /api/v1/user/issues?status=saved&page=1&limit=10
async fn list_issues(
    state: web::Data<AppState>,
    query: web::Query<StatusListQuery>,
    http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let user_id = state.sessions.authenticate(&http_req)?;
    query.validate()?;

    let status = match query.status.as_deref() {
        Some(value) => Some(IssueStatus::parse(value).ok_or_else(|| {
            ApiError::InvalidParameter("Status must be one of: saved, started, done".to_string())
        })?),
        None => None,
    };

    list_with_status(&state, &user_id, status, query.page, query.limit).await
}

/// GET /api/v1/user/issues/saved
async fn list_saved(
    state: web::Data<AppState>,
    query: web::Query<StatusListQuery>,
    http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let user_id = state.sessions.authenticate(&http_req)?;
    query.validate()?;

    list_with_status(
        &state,
        &user_id,
        Some(IssueStatus::Saved),
        query.page,
        query.limit,
    )
    .await
}

/// GET /api/v1/user/issues/done
async fn list_done(
    state: web::Data<AppState>,
    query: web::Query<StatusListQuery>,
    http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let user_id = state.sessions.authenticate(&http_req)?;
    query.validate()?;

    list_with_status(
        &state,
        &user_id,
        Some(IssueStatus::Done),
        query.page,
        query.limit,
    )
    .await
}

async fn list_with_status(
    state: &AppState,
    user_id: &str,
    status: Option<IssueStatus>,
    page: u32,
    limit: u32,
) -> Result<HttpResponse, ApiError> {
    let offset = (page - 1).saturating_mul(limit);

    let issues = state
        .postgres
        .list_user_issues(user_id, status, limit, offset)
        .await?;
    let total = state.postgres.count_user_issues(user_id, status).await?;

    let pagination = Pagination {
        page,
        limit,
        total,
        total_pages: total.div_ceil(limit as u64) as u32,
    };

    Ok(HttpResponse::Ok().json(UserIssuesResponse { issues, pagination }))
}
