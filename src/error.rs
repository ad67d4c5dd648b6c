use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::css::CssError;
use crate::db::InvalidTranslation;
use crate::language::LanguageCodeError;
use crate::security::AuthFailure;
use crate::transfer::BulkFormatError;

/// Error type for HTTP handlers.
///
/// Every variant renders as `{"success": false, "data": {"message": ...}}`
/// with a matching status code.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{}", .0.message())]
    Unauthorized(AuthFailure),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Css(#[from] CssError),

    #[error(transparent)]
    Language(#[from] LanguageCodeError),

    #[error(transparent)]
    InvalidTranslation(#[from] InvalidTranslation),

    #[error(transparent)]
    BulkFormat(#[from] BulkFormatError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Convenience type alias for handler return values.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_)
            | ApiError::Css(_)
            | ApiError::Language(_)
            | ApiError::InvalidTranslation(_)
            | ApiError::BulkFormat(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AuthFailure> for ApiError {
    fn from(failure: AuthFailure) -> Self {
        ApiError::Unauthorized(failure)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::Internal(err) => {
                tracing::error!(error = %format!("{:#}", err), "Request failed");
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        let body = json!({
            "success": false,
            "data": { "message": message },
        });

        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::bad_request("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::from(AuthFailure::InvalidToken).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(CssError::EmptyLanguageCode).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ApiError::from(InvalidTranslation::MissingField).to_string(),
            "All fields are required."
        );
        assert_eq!(
            ApiError::from(AuthFailure::InvalidToken).to_string(),
            "Invalid admin API key"
        );
        assert_eq!(
            ApiError::from(LanguageCodeError::Empty).to_string(),
            "Language code is required"
        );
    }
}
