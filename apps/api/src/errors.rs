use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extraction::ExtractionError;
use crate::resume::parser::ParseError;
use crate::scoring::ScoringError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Cannot score: {0}")]
    CannotScore(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMedia(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ExtractionError> for AppError {
    fn from(e: ExtractionError) -> Self {
        match e {
            ExtractionError::UnsupportedFormat(_) => AppError::UnsupportedMedia(e.to_string()),
            ExtractionError::Io(_) => AppError::Internal(e.into()),
            ExtractionError::Pdf(_) | ExtractionError::Docx(_) => AppError::Extraction(e.to_string()),
        }
    }
}

impl From<ParseError> for AppError {
    fn from(e: ParseError) -> Self {
        AppError::CannotScore(e.to_string())
    }
}

impl From<ScoringError> for AppError {
    fn from(e: ScoringError) -> Self {
        AppError::CannotScore(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::CannotScore(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "CANNOT_SCORE",
                msg.clone(),
            ),
            AppError::UnsupportedMedia(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_FORMAT",
                msg.clone(),
            ),
            AppError::Extraction(msg) => {
                tracing::warn!("Extraction error: {msg}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "EXTRACTION_ERROR",
                    msg.clone(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

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

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (AppError::from(ParseError::NoText), StatusCode::UNPROCESSABLE_ENTITY),
            (
                AppError::from(ExtractionError::UnsupportedFormat("cv.odt".into())),
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ),
            (
                AppError::from(ExtractionError::Pdf("bad xref".into())),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AppError::Internal(anyhow::anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_scoring_error_maps_to_cannot_score() {
        let err = AppError::from(ScoringError::InvalidResume(ParseError::NoText));
        assert!(matches!(err, AppError::CannotScore(ref m) if m.contains("no text")));
    }
}
