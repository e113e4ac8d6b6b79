use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Stable error code constants.
///
/// Clients match on `error.code`; the Spanish `message` is for display and
/// may be reworded.
pub mod error_code {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const ALREADY_EXISTS: &str = "ALREADY_EXISTS";
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    pub const UNAUTHENTICATED: &str = "UNAUTHENTICATED";
    pub const PERMISSION_DENIED: &str = "PERMISSION_DENIED";
    pub const ORDER_CLOSED: &str = "ORDER_CLOSED";
    pub const PROTECTED: &str = "PROTECTED";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Unified error type for every handler and service function.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Resource does not exist. HTTP 404.
    #[error("{0}")]
    NotFound(String),

    /// Duplicate unique key. HTTP 409.
    #[error("{0}")]
    Conflict(String),

    /// Input failed validation (missing field, bad transition, empty
    /// transfer, non-positive total...). HTTP 400.
    #[error("{0}")]
    Validation(String),

    /// Missing or invalid session token. HTTP 401.
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but the permission predicate said no. HTTP 403.
    #[error("{0}")]
    PermissionDenied(String),

    /// Write attempted against a closed order. HTTP 403.
    #[error("{0}")]
    OrderClosed(String),

    /// Delete blocked by referencing rows. HTTP 409.
    #[error("{0}")]
    Protected(String),

    /// Database failure; logged, surfaced as a generic message.
    #[error("error de base de datos")]
    Db(#[from] sea_orm::DbErr),

    /// Unexpected internal error. HTTP 500.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => error_code::NOT_FOUND,
            ApiError::Conflict(_) => error_code::ALREADY_EXISTS,
            ApiError::Validation(_) => error_code::VALIDATION_FAILED,
            ApiError::Unauthorized(_) => error_code::UNAUTHENTICATED,
            ApiError::PermissionDenied(_) => error_code::PERMISSION_DENIED,
            ApiError::OrderClosed(_) => error_code::ORDER_CLOSED,
            ApiError::Protected(_) => error_code::PROTECTED,
            ApiError::Db(_) | ApiError::Internal(_) => error_code::INTERNAL,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) | ApiError::Protected(_) => StatusCode::CONFLICT,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::PermissionDenied(_) | ApiError::OrderClosed(_) => StatusCode::FORBIDDEN,
            ApiError::Db(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Db(ref e) = self {
            tracing::error!("database error: {e}");
        }

        let status = self.status_code();
        let body = serde_json::json!({
            "success": false,
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
            }
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_mapping() {
        assert_eq!(ApiError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Conflict("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(ApiError::Validation("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Unauthorized("x".into()).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::PermissionDenied("x".into()).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::OrderClosed("x".into()).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::Protected("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn error_code_mapping() {
        assert_eq!(ApiError::NotFound("x".into()).error_code(), "NOT_FOUND");
        assert_eq!(ApiError::Validation("x".into()).error_code(), "VALIDATION_FAILED");
        assert_eq!(ApiError::OrderClosed("x".into()).error_code(), "ORDER_CLOSED");
        assert_eq!(ApiError::Protected("x".into()).error_code(), "PROTECTED");
    }

    #[test]
    fn db_error_message_is_generic() {
        let err = ApiError::Db(sea_orm::DbErr::Custom("secret detail".into()));
        assert_eq!(err.to_string(), "error de base de datos");
    }
}
