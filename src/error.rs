use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;
use validator::ValidationErrors;

use crate::models::ErrorResponse;
use crate::services::{AppwriteError, GithubError, PostgresError, SessionError};

/// Failure taxonomy for the public API
///
/// Every failure path maps onto one of these variants and renders as the
/// structured error envelope; a handler never returns a partial success
/// body. Validation and credential errors are raised before any network
/// call is attempted.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Validation failed")]
    Validation(#[from] ValidationErrors),

    #[error("{0}")]
    InvalidParameter(String),

    #[error("No GitHub account linked; connect one in settings to load your feed")]
    MissingCredential,

    #[error("{message}")]
    MissingContext { message: String, example: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upstream API failure ({status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("Internal error")]
    Internal(String),
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized => "unauthorized",
            ApiError::Validation(_) | ApiError::InvalidParameter(_) => "validation_failed",
            ApiError::MissingCredential => "missing_credential",
            ApiError::MissingContext { .. } => "missing_context",
            ApiError::NotFound(_) => "not_found",
            ApiError::Upstream { .. } => "upstream_unavailable",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_)
            | ApiError::InvalidParameter(_)
            | ApiError::MissingCredential
            | ApiError::MissingContext { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        let message = match self {
            // Never leak internals to the caller; the detail is logged below
            ApiError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let mut body = ErrorResponse::new(self.code(), message, status.as_u16());

        if let ApiError::Validation(errors) = self {
            body.details = serde_json::to_value(errors).ok();
        }
        if let ApiError::MissingContext { example, .. } = self {
            body.example = Some(example.clone());
        }

        HttpResponse::build(status).json(body)
    }
}

impl From<SessionError> for ApiError {
    fn from(_: SessionError) -> Self {
        ApiError::Unauthorized
    }
}

impl From<GithubError> for ApiError {
    fn from(err: GithubError) -> Self {
        match err {
            GithubError::NotFound(what) => ApiError::NotFound(what),
            GithubError::Upstream { status, body } => ApiError::Upstream {
                status,
                message: body,
            },
            // Transport failures (timeouts, DNS) surface as upstream
            // unavailability to the caller
            GithubError::RequestError(e) => ApiError::Upstream {
                status: 502,
                message: e.to_string(),
            },
            GithubError::InvalidResponse(detail) => ApiError::Internal(detail),
        }
    }
}

impl From<AppwriteError> for ApiError {
    fn from(err: AppwriteError) -> Self {
        match err {
            AppwriteError::NotFound(what) => ApiError::NotFound(what),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<PostgresError> for ApiError {
    fn from(err: PostgresError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::MissingCredential.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound("issue".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Upstream {
                status: 503,
                message: "down".to_string()
            }
            .status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_github_error_conversion() {
        let err: ApiError = GithubError::NotFound("issue #1".to_string()).into();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err: ApiError = GithubError::Upstream {
            status: 500,
            body: "oops".to_string(),
        }
        .into();
        assert!(matches!(err, ApiError::Upstream { status: 500, .. }));
    }

    #[test]
    fn test_internal_error_hides_detail() {
        let response = ApiError::Internal("secret db string".to_string()).error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
