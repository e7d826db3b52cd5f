//! JSON envelope and error-to-status mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use tracing::{error, warn};

use super::errmsg;
use crate::pagination::PageError;
use crate::services::ServiceError;

/// `{"status": "success", "data": ...}` with the given status code.
pub(crate) fn success<T: Serialize>(status: StatusCode, data: T) -> Response {
    (status, Json(json!({ "status": "success", "data": data }))).into_response()
}

/// Errors surfaced by REST handlers.
#[derive(Debug)]
pub enum ApiError {
    /// 400 with the given message.
    BadRequest(String),
    /// 401, identity missing.
    Unauthorized(String),
    /// 404 with the given message.
    NotFound(String),
    /// 409 with the given message.
    Conflict(String),
    /// 408, store deadline exceeded.
    Timeout,
    /// The request was cancelled; no body is written.
    Cancelled,
    /// 500, details already logged.
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ApiError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::Cancelled => return status.into_response(),
            ApiError::BadRequest(m)
            | ApiError::Unauthorized(m)
            | ApiError::NotFound(m)
            | ApiError::Conflict(m) => m,
            ApiError::Timeout => errmsg::REQUEST_TIMEOUT.to_string(),
            ApiError::Internal => errmsg::INTERNAL_ERROR.to_string(),
        };
        (status, Json(json!({ "status": "error", "message": message }))).into_response()
    }
}

impl From<PageError> for ApiError {
    fn from(err: PageError) -> Self {
        match err {
            PageError::MalformedCursor(_) | PageError::InvalidLimit { .. } => {
                ApiError::BadRequest(err.to_string())
            }
            PageError::ScopeNotFound(_) => ApiError::NotFound(errmsg::POST_NOT_FOUND.to_string()),
            PageError::Cancelled => {
                warn!("Request cancelled while paging");
                ApiError::Cancelled
            }
            PageError::Timeout => {
                warn!("Deadline exceeded while paging");
                ApiError::Timeout
            }
            PageError::Storage { .. } => {
                error!(error = %err, "Paging failed");
                ApiError::Internal
            }
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidInput(message) => ApiError::BadRequest(message),
            ServiceError::PostNotFound(_) => ApiError::NotFound(errmsg::POST_NOT_FOUND.to_string()),
            ServiceError::CommentNotFound(_) => {
                ApiError::NotFound(errmsg::COMMENT_NOT_FOUND.to_string())
            }
            ServiceError::LikeExists => ApiError::Conflict(errmsg::LIKE_EXISTS.to_string()),
            ServiceError::Cancelled => {
                warn!("Request cancelled");
                ApiError::Cancelled
            }
            ServiceError::Timeout => {
                warn!("Deadline exceeded");
                ApiError::Timeout
            }
            ServiceError::Storage { .. } => {
                error!(error = %err, "Request failed");
                ApiError::Internal
            }
            ServiceError::Page(page) => page.into(),
        }
    }
}
