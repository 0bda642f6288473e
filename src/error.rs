//! Application error type and its HTTP mapping.
//!
//! Every failure the engine can report is an [`AppError`] variant. Handlers
//! return it directly and [`IntoResponse`] turns it into a stable status code
//! plus a JSON body:
//!
//! ```json
//! { "error": { "code": "code_already_exists", "message": "Short code 'promo' already exists" } }
//! ```
//!
//! Storage failures carry no backend detail: the cause is logged where the
//! backend error is converted and callers only ever see a generic message.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error code plus a human-readable message.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid URL: {reason}")]
    InvalidUrl { reason: String },

    #[error("Invalid expiry: {reason}")]
    InvalidExpiry { reason: String },

    #[error("Invalid custom code: {reason}")]
    InvalidCode { reason: String },

    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },

    #[error("Short code '{code}' already exists")]
    CodeAlreadyExists { code: String },

    #[error("Could not allocate a unique short code after {attempts} attempts")]
    GenerationExhausted { attempts: usize },

    #[error("Short link '{code}' not found")]
    NotFound { code: String },

    #[error("Short link '{code}' has expired")]
    Expired { code: String },

    #[error("Storage operation timed out")]
    StorageTimeout,

    #[error("Storage is temporarily unavailable")]
    StorageUnavailable,
}

impl AppError {
    pub fn invalid_url(reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            reason: reason.into(),
        }
    }

    pub fn invalid_expiry(reason: impl Into<String>) -> Self {
        Self::InvalidExpiry {
            reason: reason.into(),
        }
    }

    pub fn invalid_code(reason: impl Into<String>) -> Self {
        Self::InvalidCode {
            reason: reason.into(),
        }
    }

    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }

    pub fn code_exists(code: impl Into<String>) -> Self {
        Self::CodeAlreadyExists { code: code.into() }
    }

    pub fn not_found(code: impl Into<String>) -> Self {
        Self::NotFound { code: code.into() }
    }

    pub fn expired(code: impl Into<String>) -> Self {
        Self::Expired { code: code.into() }
    }

    /// Stable snake_case identifier, used in response bodies and as the
    /// `kind` label on error metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidUrl { .. } => "invalid_url",
            Self::InvalidExpiry { .. } => "invalid_expiry",
            Self::InvalidCode { .. } => "invalid_code",
            Self::InvalidRequest { .. } => "invalid_request",
            Self::CodeAlreadyExists { .. } => "code_already_exists",
            Self::GenerationExhausted { .. } => "generation_exhausted",
            Self::NotFound { .. } => "not_found",
            Self::Expired { .. } => "expired",
            Self::StorageTimeout => "storage_timeout",
            Self::StorageUnavailable => "storage_unavailable",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidUrl { .. }
            | Self::InvalidExpiry { .. }
            | Self::InvalidCode { .. }
            | Self::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            Self::CodeAlreadyExists { .. } => StatusCode::CONFLICT,
            Self::NotFound { .. } | Self::Expired { .. } => StatusCode::NOT_FOUND,
            Self::GenerationExhausted { .. } | Self::StorageTimeout | Self::StorageUnavailable => {
                StatusCode::SERVICE_UNAVAILABLE
            }
        }
    }

    /// Transient storage failures are worth retrying; everything else is final.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::StorageTimeout | Self::StorageUnavailable)
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        ErrorInfo {
            code: self.kind(),
            message: self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        map_sqlx_error(e)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        Self::InvalidRequest {
            reason: e.to_string(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        Self::InvalidRequest {
            reason: e.body_text(),
        }
    }
}

/// Maps a database error onto the storage error kinds.
///
/// Pool acquisition timeouts become [`AppError::StorageTimeout`]; anything
/// else is reported as [`AppError::StorageUnavailable`] after the cause is
/// logged.
pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::PoolTimedOut => {
            tracing::warn!("Database pool timed out");
            AppError::StorageTimeout
        }
        other => {
            tracing::error!(error = %other, "Database error");
            AppError::StorageUnavailable
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::invalid_url("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::invalid_expiry("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::code_exists("promo").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::GenerationExhausted { attempts: 5 }.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::not_found("abc").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(AppError::expired("abc").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::StorageTimeout.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_only_storage_errors_are_transient() {
        assert!(AppError::StorageTimeout.is_transient());
        assert!(AppError::StorageUnavailable.is_transient());
        assert!(!AppError::code_exists("x").is_transient());
        assert!(!AppError::not_found("x").is_transient());
        assert!(!AppError::GenerationExhausted { attempts: 5 }.is_transient());
    }

    #[test]
    fn test_storage_errors_do_not_leak_detail() {
        let err = map_sqlx_error(sqlx::Error::Protocol("secret internals".to_string()));
        assert!(matches!(err, AppError::StorageUnavailable));
        assert!(!err.to_string().contains("secret"));
    }

    #[test]
    fn test_pool_timeout_maps_to_storage_timeout() {
        let err = map_sqlx_error(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, AppError::StorageTimeout));
    }

    #[test]
    fn test_error_info_uses_kind() {
        let info = AppError::code_exists("promo").to_error_info();
        assert_eq!(info.code, "code_already_exists");
        assert!(info.message.contains("promo"));
    }
}
