//! Error handling middleware - RFC 7807 compliant responses.

use std::fmt;

use actix_web::{HttpMessage, HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use devlog_core::error::{DomainError, RepoError};
use devlog_core::ports::AssistantError;
use devlog_shared::ErrorResponse;

use crate::observability::RequestId;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    TooManyRequests(String),
    Unavailable(String),
    /// An assistant call failed. The reason is logged, not returned.
    Assistant {
        operation: &'static str,
        reason: String,
    },
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::TooManyRequests(msg) => write!(f, "Too many requests: {}", msg),
            AppError::Unavailable(msg) => write!(f, "Service unavailable: {}", msg),
            AppError::Assistant { operation, reason } => {
                write!(f, "{} failed: {}", operation, reason)
            }
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl AppError {
    /// The problem document for this error.
    pub fn problem(&self) -> ErrorResponse {
        match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Conflict(detail) => ErrorResponse::conflict(detail),
            AppError::TooManyRequests(detail) => ErrorResponse::too_many_requests(detail),
            AppError::Unavailable(detail) => ErrorResponse::service_unavailable(detail),
            AppError::Assistant { operation, reason } => {
                tracing::error!(operation, reason = %reason, "AI assistant call failed");
                ErrorResponse::internal_error(format!("{} failed", operation))
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error("An unexpected error occurred")
            }
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Assistant { .. } | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.problem())
    }
}

/// Turn a body or query extraction failure into a 400 problem document.
pub fn payload_error(err: impl fmt::Display, req: &HttpRequest) -> actix_web::Error {
    let mut problem = ErrorResponse::bad_request(err.to_string());
    if let Some(id) = req.extensions().get::<RequestId>() {
        problem = problem.with_request_id(id.as_str());
    }
    actix_web::error::InternalError::from_response(
        err.to_string(),
        HttpResponse::BadRequest().json(problem),
    )
    .into()
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, key } => {
                AppError::NotFound(format!("{} {} not found", entity_type, key))
            }
            DomainError::MissingFields(_) => AppError::BadRequest(err.to_string()),
            DomainError::Validation(msg) => AppError::BadRequest(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Post not found".to_string()),
            RepoError::Constraint(msg) => AppError::Conflict(msg),
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

impl AppError {
    /// Map an assistant failure for the named operation.
    pub fn assistant(operation: &'static str) -> impl FnOnce(AssistantError) -> Self {
        move |err| AppError::Assistant {
            operation,
            reason: err.to_string(),
        }
    }
}

impl From<AssistantError> for AppError {
    fn from(err: AssistantError) -> Self {
        AppError::assistant("AI request")(err)
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_keep_their_message() {
        let err = AppError::from(DomainError::MissingFields(vec!["title", "slug"]));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.problem().detail.as_deref(),
            Some("Missing required fields: title, slug")
        );
    }

    #[test]
    fn repository_errors_map_to_statuses() {
        assert_eq!(
            AppError::from(RepoError::NotFound).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(RepoError::Constraint("slug".into())).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(RepoError::Query("boom".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_details_are_not_exposed() {
        let problem = AppError::Internal("pool exhausted".into()).problem();
        assert_eq!(problem.status, 500);
        assert_eq!(problem.detail.as_deref(), Some("An unexpected error occurred"));

        let problem = AppError::assistant("Code explanation")(AssistantError::EmptyResponse).problem();
        assert_eq!(problem.status, 500);
        assert_eq!(problem.detail.as_deref(), Some("Code explanation failed"));
    }
}
