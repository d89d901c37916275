use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extract::ExtractionError;
use crate::llm_client::LlmError;
use crate::scrape::FetchError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Extraction(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "EXTRACTION_ERROR",
                e.to_string(),
            ),
            AppError::Fetch(e @ FetchError::InvalidUrl(_)) => {
                (StatusCode::BAD_REQUEST, "FETCH_ERROR", e.to_string())
            }
            AppError::Fetch(e) => {
                tracing::warn!("Fetch error: {e}");
                (StatusCode::BAD_GATEWAY, "FETCH_ERROR", e.to_string())
            }
            AppError::Llm(e) => {
                tracing::error!("LLM error: {e}");
                (StatusCode::BAD_GATEWAY, "LLM_ERROR", e.to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrape::fetcher::FETCH_TIMEOUT;

    #[test]
    fn test_extraction_error_is_unprocessable() {
        let (status, code, message) = AppError::from(ExtractionError::NoPages).parts();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(code, "EXTRACTION_ERROR");
        assert!(message.contains("no pages"));
    }

    #[test]
    fn test_invalid_url_is_bad_request_but_upstream_failure_is_bad_gateway() {
        let (status, _, _) = AppError::from(FetchError::InvalidUrl("x".to_string())).parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, code, _) = AppError::from(FetchError::Timeout(FETCH_TIMEOUT)).parts();
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(code, "FETCH_ERROR");
    }

    #[test]
    fn test_llm_error_message_is_passed_through() {
        let err = LlmError::Invocation {
            model_id: "m".to_string(),
            message: "ExpiredTokenException".to_string(),
        };
        let (status, code, message) = AppError::from(err).parts();
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(code, "LLM_ERROR");
        assert!(message.contains("ExpiredTokenException"));
    }

    #[test]
    fn test_internal_error_hides_details() {
        let (status, _, message) = AppError::from(anyhow::anyhow!("secret detail")).parts();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!message.contains("secret"));
    }

    #[test]
    fn test_conflict_is_409() {
        let (status, code, message) =
            AppError::Conflict("CV changed during analysis".to_string()).parts();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(code, "CONFLICT");
        assert_eq!(message, "CV changed during analysis");
    }
}
